// ── Domain catalog ──
//
// The fixed set of configuration domains the device exposes. Every other
// component works off these descriptors instead of per-domain code.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::CoreError;
use crate::model::field::{FieldKind, FieldSpec, Scalar};

/// Identifier of a configuration domain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DomainId {
    Interfaces,
    Vlans,
    Stp,
    Lldp,
    #[strum(to_string = "igmp-snooping", serialize = "igmp")]
    IgmpSnooping,
    #[strum(to_string = "static-routes", serialize = "routes")]
    StaticRoutes,
    Ospf,
    Bgp,
    System,
    Aaa,
}

impl DomainId {
    /// Parse an identifier, accepting the short aliases `igmp` and `routes`.
    pub fn parse(id: &str) -> Result<Self, CoreError> {
        id.parse()
            .map_err(|_| CoreError::UnknownDomain(id.to_owned()))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// How a domain's remote representation is organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Shape {
    /// JSON object of records keyed by name or id.
    MapByKey,
    /// JSON array; entries are addressed by position.
    OrderedList,
    /// A single JSON object.
    Singleton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Layer {
    #[strum(to_string = "Layer 2")]
    L2,
    #[strum(to_string = "Layer 3")]
    L3,
    #[strum(to_string = "Management")]
    Mgmt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    pub fn method(self) -> nateos_api::Method {
        match self {
            Self::Get => nateos_api::Method::GET,
            Self::Put => nateos_api::Method::PUT,
            Self::Post => nateos_api::Method::POST,
            Self::Delete => nateos_api::Method::DELETE,
        }
    }
}

/// What a user action asks of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MutationKind {
    Upsert,
    Append,
    Delete,
}

/// Where an upsert lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertRoute {
    /// `PUT {path}` (singletons).
    Resource,
    /// `PUT {path}/{key}`.
    Member,
    /// `POST {path}`; the key travels inside the payload.
    Create,
}

/// How entries of a keyed or list domain are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// The key is also a payload field (the remote derives it from the body).
    pub in_payload: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub id: DomainId,
    pub title: &'static str,
    pub layer: Layer,
    /// Path relative to the API base, without leading slash.
    pub resource_path: &'static str,
    pub shape: Shape,
    pub key: Option<KeySpec>,
    pub fields: &'static [FieldSpec],
    /// Verbs the remote accepts for this domain.
    pub verbs: &'static [Verb],
    pub upsert: Option<UpsertRoute>,
    /// Shown when a keyed or list domain has no entries.
    pub empty_label: &'static str,
}

impl DomainDescriptor {
    pub fn accepts(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields shown as columns next to the key (the key field itself is
    /// already its own column).
    pub fn column_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + use<> {
        let key_field = self.key.filter(|k| k.in_payload).map(|k| k.name);
        self.fields
            .iter()
            .filter(move |f| Some(f.name) != key_field)
    }
}

/// Look up a domain's descriptor.
pub fn describe(id: DomainId) -> &'static DomainDescriptor {
    match id {
        DomainId::Interfaces => &INTERFACES,
        DomainId::Vlans => &VLANS,
        DomainId::Stp => &STP,
        DomainId::Lldp => &LLDP,
        DomainId::IgmpSnooping => &IGMP_SNOOPING,
        DomainId::StaticRoutes => &STATIC_ROUTES,
        DomainId::Ospf => &OSPF,
        DomainId::Bgp => &BGP,
        DomainId::System => &SYSTEM,
        DomainId::Aaa => &AAA,
    }
}

/// Look up a domain by its string identifier.
pub fn describe_str(id: &str) -> Result<&'static DomainDescriptor, CoreError> {
    DomainId::parse(id).map(describe)
}

/// Every descriptor in catalog order.
pub fn catalog() -> impl Iterator<Item = &'static DomainDescriptor> {
    DomainId::iter().map(describe)
}

// ── Descriptors ──────────────────────────────────────────────────────

const SINGLETON_VERBS: &[Verb] = &[Verb::Get, Verb::Put];

const fn singleton(
    id: DomainId,
    title: &'static str,
    layer: Layer,
    resource_path: &'static str,
    fields: &'static [FieldSpec],
) -> DomainDescriptor {
    DomainDescriptor {
        id,
        title,
        layer,
        resource_path,
        shape: Shape::Singleton,
        key: None,
        fields,
        verbs: SINGLETON_VERBS,
        upsert: Some(UpsertRoute::Resource),
        empty_label: "",
    }
}

const ENABLED: FieldSpec = FieldSpec::toggle("enabled", "Enabled").stored(Scalar::Bool(false));

static INTERFACES: DomainDescriptor = DomainDescriptor {
    id: DomainId::Interfaces,
    title: "Interfaces",
    layer: Layer::L2,
    resource_path: "l2/interfaces",
    shape: Shape::MapByKey,
    key: Some(KeySpec {
        name: "name",
        label: "Interface",
        kind: FieldKind::Text,
        in_payload: false,
    }),
    fields: &[
        FieldSpec::choice("mode", "Mode", &["access", "trunk"]).stored(Scalar::Str("access")),
        FieldSpec::number("vlan", "VLAN").shown_as("N/A"),
    ],
    verbs: &[Verb::Get, Verb::Put],
    upsert: Some(UpsertRoute::Member),
    empty_label: "No interfaces configured",
};

static VLANS: DomainDescriptor = DomainDescriptor {
    id: DomainId::Vlans,
    title: "VLANs",
    layer: Layer::L2,
    resource_path: "l2/vlans",
    shape: Shape::MapByKey,
    key: Some(KeySpec {
        name: "vlan_id",
        label: "VLAN ID",
        kind: FieldKind::Number,
        in_payload: true,
    }),
    fields: &[
        FieldSpec::number("vlan_id", "VLAN ID").required(),
        FieldSpec::text("name", "Name").shown_as("Unnamed"),
    ],
    verbs: &[Verb::Get, Verb::Post, Verb::Delete],
    upsert: Some(UpsertRoute::Create),
    empty_label: "No VLANs configured",
};

const STP_FIELDS: &[FieldSpec] = &[
    ENABLED,
    FieldSpec::choice("mode", "Mode", &["stp", "rstp", "mstp"]).stored(Scalar::Str("rstp")),
    FieldSpec::number("priority", "Bridge Priority").stored(Scalar::Int(32768)),
];
const TOGGLE_FIELDS: &[FieldSpec] = &[ENABLED];
const BGP_FIELDS: &[FieldSpec] = &[ENABLED, FieldSpec::number("asn", "Local AS")];
const SYSTEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("hostname", "Hostname"),
    FieldSpec::text("domain", "Domain"),
];
const AAA_FIELDS: &[FieldSpec] = &[FieldSpec::choice(
    "auth_method",
    "Authentication",
    &["local", "radius", "tacacs"],
)
.stored(Scalar::Str("local"))];

static STP: DomainDescriptor =
    singleton(DomainId::Stp, "Spanning Tree", Layer::L2, "l2/stp", STP_FIELDS);

static LLDP: DomainDescriptor =
    singleton(DomainId::Lldp, "LLDP", Layer::L2, "l2/lldp", TOGGLE_FIELDS);

static IGMP_SNOOPING: DomainDescriptor = singleton(
    DomainId::IgmpSnooping,
    "IGMP Snooping",
    Layer::L2,
    "l2/igmp-snooping",
    TOGGLE_FIELDS,
);

static STATIC_ROUTES: DomainDescriptor = DomainDescriptor {
    id: DomainId::StaticRoutes,
    title: "Static Routes",
    layer: Layer::L3,
    resource_path: "l3/static-routes",
    shape: Shape::OrderedList,
    key: Some(KeySpec {
        name: "index",
        label: "#",
        kind: FieldKind::Number,
        in_payload: false,
    }),
    fields: &[
        FieldSpec::text("destination", "Destination").shown_as("N/A"),
        FieldSpec::text("gateway", "Gateway").shown_as("N/A"),
    ],
    verbs: &[Verb::Get, Verb::Post, Verb::Delete],
    upsert: None,
    empty_label: "No static routes configured",
};

static OSPF: DomainDescriptor =
    singleton(DomainId::Ospf, "OSPF", Layer::L3, "l3/ospf", TOGGLE_FIELDS);

static BGP: DomainDescriptor = singleton(DomainId::Bgp, "BGP", Layer::L3, "l3/bgp", BGP_FIELDS);

static SYSTEM: DomainDescriptor =
    singleton(DomainId::System, "System", Layer::Mgmt, "mgmt/system", SYSTEM_FIELDS);

static AAA: DomainDescriptor = singleton(DomainId::Aaa, "AAA", Layer::Mgmt, "mgmt/aaa", AAA_FIELDS);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_describes_itself() {
        for id in DomainId::all() {
            assert_eq!(describe(id).id, id);
        }
        assert_eq!(catalog().count(), 10);
    }

    #[test]
    fn string_ids_round_trip_and_accept_aliases() {
        for id in DomainId::all() {
            assert_eq!(DomainId::parse(&id.to_string()).unwrap(), id);
        }
        assert_eq!(DomainId::parse("routes").unwrap(), DomainId::StaticRoutes);
        assert_eq!(DomainId::parse("igmp").unwrap(), DomainId::IgmpSnooping);
        assert_eq!(DomainId::parse("VLANS").unwrap(), DomainId::Vlans);
    }

    #[test]
    fn unknown_domain_is_an_error() {
        let err = describe_str("lacp").unwrap_err();
        assert!(matches!(err, CoreError::UnknownDomain(ref id) if id == "lacp"));
    }

    #[test]
    fn shapes_match_routes() {
        for descriptor in catalog() {
            match descriptor.shape {
                Shape::Singleton => {
                    assert_eq!(descriptor.upsert, Some(UpsertRoute::Resource));
                    assert!(descriptor.key.is_none());
                }
                Shape::MapByKey => assert!(descriptor.key.is_some()),
                Shape::OrderedList => assert!(descriptor.upsert.is_none()),
            }
        }
    }

    #[test]
    fn vlan_columns_skip_the_key_field() {
        let names: Vec<_> = describe(DomainId::Vlans)
            .column_fields()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["name"]);
    }
}
