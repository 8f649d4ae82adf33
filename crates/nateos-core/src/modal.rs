// ── Modal form controller ──
//
// At most one form is open at a time. Submitting always closes the form
// first and then dispatches the mutation in the background; the caller
// learns the outcome from the notification feed (or the returned handle).

use std::collections::BTreeMap;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{
    DomainId, FieldSpec, MutationKind, Record, Shape, UpsertRoute, describe,
};
use crate::mutation::{Mutation, MutationGateway, MutationResult, outcome_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Addresses the member being written (goes into the path).
    Key,
    /// Part of the payload.
    Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub spec: FieldSpec,
    pub role: FieldRole,
    pub initial: Option<String>,
}

/// Field layout and submit target of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub title: String,
    pub domain: DomainId,
    pub kind: MutationKind,
    pub fields: Vec<FormField>,
}

impl FormSpec {
    /// The form for `kind` on `domain`, derived from its descriptor.
    pub fn for_domain(domain: DomainId, kind: MutationKind) -> Result<Self, CoreError> {
        let descriptor = describe(domain);
        let unsupported = CoreError::UnsupportedMutation { domain, kind };

        let (verb, key_field) = match (kind, descriptor.upsert, descriptor.shape) {
            (MutationKind::Upsert, Some(UpsertRoute::Member), _) => {
                let key = descriptor.key.ok_or(unsupported)?;
                let spec = FieldSpec {
                    kind: key.kind,
                    ..FieldSpec::text(key.name, key.label).required()
                };
                ("Configure", Some(spec))
            }
            (MutationKind::Upsert, Some(UpsertRoute::Create), _) => ("Create", None),
            (MutationKind::Upsert, Some(UpsertRoute::Resource), _) => ("Configure", None),
            (MutationKind::Append, _, Shape::OrderedList) => ("Add", None),
            _ => return Err(unsupported),
        };

        let fields = key_field
            .into_iter()
            .map(|spec| FormField {
                spec,
                role: FieldRole::Key,
                initial: None,
            })
            .chain(descriptor.fields.iter().map(|spec| FormField {
                spec: *spec,
                role: FieldRole::Payload,
                initial: None,
            }))
            .collect();

        Ok(Self {
            title: format!("{verb} {}", descriptor.title),
            domain,
            kind,
            fields,
        })
    }

    /// Pre-fill the key field.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        for field in &mut self.fields {
            if field.role == FieldRole::Key {
                field.initial = Some(key.clone());
            }
        }
        self
    }

    /// Pre-fill payload fields from an existing record.
    pub fn with_values(mut self, record: &Record) -> Self {
        for field in &mut self.fields {
            if field.role == FieldRole::Payload {
                if let Some(text) = record.get(field.spec.name).and_then(|v| field.spec.to_input(v))
                {
                    field.initial = Some(text);
                }
            }
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.name == name)
    }
}

/// The one open form and its captured text.
#[derive(Debug, Clone)]
pub struct ModalSession {
    id: u64,
    form: FormSpec,
    values: BTreeMap<String, String>,
}

impl ModalSession {
    fn new(id: u64, form: FormSpec) -> Self {
        let values = form
            .fields
            .iter()
            .filter_map(|f| f.initial.clone().map(|v| (f.spec.name.to_owned(), v)))
            .collect();
        Self { id, form, values }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Apply coercion to everything captured.
    fn into_mutation(self) -> Result<Mutation, CoreError> {
        let mut key = None;
        let mut payload = Record::new();

        for field in &self.form.fields {
            let raw = self.values.get(field.spec.name).map_or("", String::as_str);
            match field.role {
                FieldRole::Key => {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        return Err(CoreError::MissingKey {
                            domain: self.form.domain,
                            kind: self.form.kind,
                        });
                    }
                    key = Some(trimmed.to_owned());
                }
                FieldRole::Payload => {
                    if let Some(value) = field.spec.coerce(raw)? {
                        payload.insert(field.spec.name, value);
                    }
                }
            }
        }

        Ok(Mutation {
            domain: self.form.domain,
            kind: self.form.kind,
            key,
            payload: Some(payload),
        })
    }
}

/// `Closed -> Open(form) -> Closed`.
pub struct ModalController {
    mutations: MutationGateway,
    session: Option<ModalSession>,
    opened: u64,
}

impl ModalController {
    pub(crate) fn new(mutations: MutationGateway) -> Self {
        Self {
            mutations,
            session: None,
            opened: 0,
        }
    }

    /// Open a form, discarding any session that was already open.
    pub fn open(&mut self, form: FormSpec) -> &ModalSession {
        self.opened += 1;
        if let Some(previous) = &self.session {
            debug!(session = previous.id, "replacing open form");
        }
        self.session.insert(ModalSession::new(self.opened, form))
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    /// Record captured text for one field of the open form.
    pub fn capture(&mut self, field: &str, text: impl Into<String>) -> Result<(), CoreError> {
        let session = self.session.as_mut().ok_or(CoreError::NoActiveModal)?;
        if session.form.field(field).is_none() {
            return Err(CoreError::UnknownField(field.to_owned()));
        }
        session.values.insert(field.to_owned(), text.into());
        Ok(())
    }

    /// Close without submitting.
    pub fn cancel(&mut self) -> Option<ModalSession> {
        self.session.take()
    }

    /// Close the form and dispatch its mutation.
    ///
    /// The form is closed before anything else happens. If the captured
    /// values fail coercion a failure notification is posted and nothing is
    /// sent.
    ///
    /// Dispatch needs a Tokio runtime. Called outside one, this returns
    /// `NoRuntime` and leaves the form open.
    pub fn submit(&mut self) -> Result<JoinHandle<MutationResult>, CoreError> {
        if self.session.is_none() {
            return Err(CoreError::NoActiveModal);
        }
        let runtime = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let session = self.session.take().ok_or(CoreError::NoActiveModal)?;
        let (domain, kind) = (session.form.domain, session.form.kind);

        match session.into_mutation() {
            Ok(mutation) => {
                let mutations = self.mutations.clone();
                Ok(runtime.spawn(async move { mutations.mutate(mutation).await }))
            }
            Err(e) => {
                warn!(%domain, %kind, error = %e, "form submission rejected");
                self.mutations
                    .notifications()
                    .failure(outcome_message(domain, kind, false));
                Err(e)
            }
        }
    }
}
