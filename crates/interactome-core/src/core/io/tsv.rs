use super::traits::{InteractionWriter, WriteError};
use crate::core::models::interaction::Interaction;
use serde::Serialize;
use std::io::Write;

const NAMESPACE: &str = "reactome";

#[derive(Serialize)]
struct TsvRow<'a> {
    #[serde(rename = "Interactor A id")]
    a_id: &'a str,
    #[serde(rename = "Interactor A name")]
    a_name: &'a str,
    #[serde(rename = "Interactor A class")]
    a_class: &'a str,
    #[serde(rename = "Interactor A stoichiometry")]
    a_stoichiometry: u32,
    #[serde(rename = "Interactor B id")]
    b_id: &'a str,
    #[serde(rename = "Interactor B name")]
    b_name: &'a str,
    #[serde(rename = "Interactor B class")]
    b_class: &'a str,
    #[serde(rename = "Interactor B stoichiometry")]
    b_stoichiometry: u32,
    #[serde(rename = "Interaction type")]
    interaction_type: &'a str,
    #[serde(rename = "Source container id")]
    container: &'a str,
    #[serde(rename = "Source container class")]
    container_class: String,
    #[serde(rename = "Database")]
    database: &'a str,
}

/// Headered tab-delimited encoder for the same interaction records the
/// PSI-MITAB writer receives, in a spreadsheet-friendly layout.
pub struct TsvWriter<W: Write> {
    out: csv::Writer<W>,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: csv::WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(true)
                .from_writer(out),
        }
    }
}

impl<W: Write> InteractionWriter for TsvWriter<W> {
    fn format_name(&self) -> &'static str {
        "tab-delimited"
    }

    fn write(&mut self, interaction: &Interaction) -> Result<(), WriteError> {
        self.out.serialize(TsvRow {
            a_id: interaction.a.id.as_str(),
            a_name: &interaction.a.name,
            a_class: interaction.a.class,
            a_stoichiometry: interaction.a.stoichiometry,
            b_id: interaction.b.id.as_str(),
            b_name: &interaction.b.name,
            b_class: interaction.b.class,
            b_stoichiometry: interaction.b.stoichiometry,
            interaction_type: interaction.provenance.interaction_type.descriptor(),
            container: interaction.provenance.container.as_str(),
            container_class: interaction.provenance.container_kind.to_string(),
            database: NAMESPACE,
        })?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        Ok(())
    }
}
