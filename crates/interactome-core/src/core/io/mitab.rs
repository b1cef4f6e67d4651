use super::traits::{InteractionWriter, WriteError};
use crate::core::models::interaction::{Interaction, InteractionType, Participant};
use std::io::Write;

const NAMESPACE: &str = "reactome";
const EMPTY: &str = "-";
const COLUMN_COUNT: usize = 42;

const HEADER: [&str; COLUMN_COUNT] = [
    "#ID(s) interactor A",
    "ID(s) interactor B",
    "Alt. ID(s) interactor A",
    "Alt. ID(s) interactor B",
    "Alias(es) interactor A",
    "Alias(es) interactor B",
    "Interaction detection method(s)",
    "Publication 1st author(s)",
    "Publication Identifier(s)",
    "Taxid interactor A",
    "Taxid interactor B",
    "Interaction type(s)",
    "Source database(s)",
    "Interaction identifier(s)",
    "Confidence value(s)",
    "Expansion method(s)",
    "Biological role(s) interactor A",
    "Biological role(s) interactor B",
    "Experimental role(s) interactor A",
    "Experimental role(s) interactor B",
    "Type(s) interactor A",
    "Type(s) interactor B",
    "Xref(s) interactor A",
    "Xref(s) interactor B",
    "Interaction Xref(s)",
    "Annotation(s) interactor A",
    "Annotation(s) interactor B",
    "Interaction annotation(s)",
    "Host organism(s)",
    "Interaction parameter(s)",
    "Creation date",
    "Update date",
    "Checksum(s) interactor A",
    "Checksum(s) interactor B",
    "Interaction Checksum(s)",
    "Negative",
    "Feature(s) interactor A",
    "Feature(s) interactor B",
    "Stoichiometry(s) interactor A",
    "Stoichiometry(s) interactor B",
    "Identification method participant A",
    "Identification method participant B",
];

/// PSI-MITAB 2.7 encoder: one 42-column tab-separated row per interaction,
/// `-` for fields the structural inference model does not carry.
pub struct MitabWriter<W: Write> {
    out: W,
    wrote_header: bool,
}

impl<W: Write> MitabWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_header: false,
        }
    }

    fn columns(interaction: &Interaction) -> [String; COLUMN_COUNT] {
        let detection = controlled_term("MI:0364", "inferred by curator");
        let source = controlled_term("MI:0467", NAMESPACE);
        let (type_id, type_label) = interaction.provenance.interaction_type.psi_mi();
        let expansion = match interaction.provenance.interaction_type {
            InteractionType::CatalystSubstrate => EMPTY.to_string(),
            _ => controlled_term("MI:1061", "matrix expansion"),
        };
        let unspecified_role = controlled_term("MI:0499", "unspecified role");

        [
            identifier(&interaction.a),
            identifier(&interaction.b),
            EMPTY.to_string(),
            EMPTY.to_string(),
            alias(&interaction.a),
            alias(&interaction.b),
            detection.clone(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            controlled_term(type_id, type_label),
            source,
            format!("{}:{}", NAMESPACE, interaction.provenance.container),
            EMPTY.to_string(),
            expansion,
            unspecified_role.clone(),
            unspecified_role.clone(),
            unspecified_role.clone(),
            unspecified_role,
            interactor_type(&interaction.a),
            interactor_type(&interaction.b),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            format!("comment:\"{}\"", interaction.provenance.interaction_type),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            "false".to_string(),
            EMPTY.to_string(),
            EMPTY.to_string(),
            interaction.a.stoichiometry.to_string(),
            interaction.b.stoichiometry.to_string(),
            detection.clone(),
            detection,
        ]
    }
}

fn identifier(participant: &Participant) -> String {
    format!("{}:{}", NAMESPACE, participant.id)
}

fn alias(participant: &Participant) -> String {
    format!(
        "{}:\"{}\"(display name)",
        NAMESPACE,
        sanitize(&participant.name)
    )
}

fn interactor_type(participant: &Participant) -> String {
    let (id, label) = match participant.class {
        "EntityWithAccessionedSequence" => ("MI:0326", "protein"),
        "SimpleEntity" => ("MI:0328", "small molecule"),
        "Complex" => ("MI:0314", "complex"),
        "Polymer" => ("MI:0383", "biopolymer"),
        _ => ("MI:0313", "interactor"),
    };
    controlled_term(id, label)
}

fn controlled_term(id: &str, label: &str) -> String {
    format!("psi-mi:\"{}\"({})", id, label)
}

fn sanitize(value: &str) -> String {
    value.replace(['\t', '\n', '"'], " ")
}

impl<W: Write> InteractionWriter for MitabWriter<W> {
    fn format_name(&self) -> &'static str {
        "psi-mitab"
    }

    fn write(&mut self, interaction: &Interaction) -> Result<(), WriteError> {
        if !self.wrote_header {
            writeln!(self.out, "{}", HEADER.join("\t"))?;
            self.wrote_header = true;
        }
        writeln!(self.out, "{}", Self::columns(interaction).join("\t"))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::ContainerKind;
    use crate::core::models::interaction::Provenance;

    fn interaction() -> Interaction {
        Interaction::between(
            Participant {
                id: "R-HSA-1".into(),
                name: "KRAS".into(),
                class: "EntityWithAccessionedSequence",
                stoichiometry: 1,
            },
            Participant {
                id: "R-HSA-2".into(),
                name: "GTP".into(),
                class: "SimpleEntity",
                stoichiometry: 2,
            },
            Provenance {
                container: "R-HSA-100".into(),
                container_kind: ContainerKind::Complex,
                interaction_type: InteractionType::CoComplex,
            },
        )
        .unwrap()
    }

    fn written_lines(records: &[Interaction]) -> Vec<String> {
        let mut buffer = Vec::new();
        let mut writer = MitabWriter::new(&mut buffer);
        for record in records {
            writer.write(record).unwrap();
        }
        writer.flush().unwrap();
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn every_row_has_exactly_42_columns() {
        let lines = written_lines(&[interaction()]);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.split('\t').count(), COLUMN_COUNT);
        }
    }

    #[test]
    fn header_is_written_once() {
        let lines = written_lines(&[interaction(), interaction()]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#ID(s) interactor A"));
        assert!(!lines[1].starts_with('#'));
    }

    #[test]
    fn rows_carry_namespaced_identifiers_and_stoichiometry() {
        let lines = written_lines(&[interaction()]);
        let columns: Vec<&str> = lines[1].split('\t').collect();

        assert_eq!(columns[0], "reactome:R-HSA-1");
        assert_eq!(columns[1], "reactome:R-HSA-2");
        assert_eq!(columns[13], "reactome:R-HSA-100");
        assert_eq!(columns[38], "1");
        assert_eq!(columns[39], "2");
        assert_eq!(columns[21], "psi-mi:\"MI:0328\"(small molecule)");
    }
}
