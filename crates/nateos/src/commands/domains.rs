//! `domains` handler: the configuration catalog.

use serde::Serialize;

use nateos_core::{DomainDescriptor, DomainId, Layer, Shape, catalog};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct CatalogEntry {
    domain: DomainId,
    title: &'static str,
    layer: Layer,
    path: &'static str,
    shape: Shape,
    fields: Vec<&'static str>,
}

impl From<&DomainDescriptor> for CatalogEntry {
    fn from(d: &DomainDescriptor) -> Self {
        Self {
            domain: d.id,
            title: d.title,
            layer: d.layer,
            path: d.resource_path,
            shape: d.shape,
            fields: d.fields.iter().map(|f| f.name).collect(),
        }
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let entries: Vec<CatalogEntry> = catalog().map(CatalogEntry::from).collect();

    let out = match global.output {
        OutputFormat::Table => {
            let rows = entries
                .iter()
                .map(|e| {
                    vec![
                        e.domain.to_string(),
                        e.title.to_owned(),
                        e.layer.to_string(),
                        e.shape.to_string(),
                        e.fields.join(", "),
                    ]
                })
                .collect();
            output::render_table(&["Domain", "Title", "Layer", "Shape", "Fields"], rows)
        }
        OutputFormat::Plain => entries
            .iter()
            .map(|e| e.domain.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        format => output::render_structured(format, &entries)?.unwrap_or_default(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
