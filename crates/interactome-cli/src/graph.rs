use crate::error::Result;
use interactome::core::graph::{EntityGraph, GraphError};
use interactome::core::models::entity::{CatalystActivity, Entity, EntityKind, StId};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Entity-store provider speaking the graph database's HTTP transaction
/// API: one Cypher statement per request against `/db/{name}/tx/commit`,
/// authenticated with basic auth.
///
/// Relationship `stoichiometry` properties expand into repeated child
/// identifiers, matching the occurrence-counting contract of the
/// participant extractor.
pub struct RemoteGraph {
    client: Client,
    endpoint: String,
    user: String,
    password: String,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}

impl RemoteGraph {
    /// Connects and verifies the store is reachable with the given
    /// credentials before any traversal begins.
    pub fn connect(host: &str, user: &str, password: &str, database: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let endpoint = format!("{}/db/{}/tx/commit", host.trim_end_matches('/'), database);
        let graph = Self {
            client,
            endpoint,
            user: user.to_string(),
            password: password.to_string(),
        };
        graph.query("RETURN 1", json!({}))?;
        debug!(endpoint = %graph.endpoint, "Connected to the entity store.");
        Ok(graph)
    }

    fn query(
        &self,
        statement: &str,
        parameters: Value,
    ) -> std::result::Result<Vec<Vec<Value>>, GraphError> {
        let body = json!({
            "statements": [{ "statement": statement, "parameters": parameters }]
        });
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| GraphError::Backend {
                message: e.to_string(),
            })?;
        let text = response.text().map_err(|e| GraphError::Backend {
            message: e.to_string(),
        })?;
        parse_rows(&text)
    }

    fn child_ids(
        &self,
        id: &StId,
        relationship: &str,
    ) -> std::result::Result<Vec<StId>, GraphError> {
        let statement = format!(
            "MATCH (n:DatabaseObject {{stId: $stId}})-[r:{relationship}]->(c) \
             RETURN c.stId, coalesce(r.stoichiometry, 1) ORDER BY c.stId"
        );
        let rows = self.query(&statement, json!({ "stId": id.as_str() }))?;

        let mut children = Vec::new();
        for row in rows {
            let Some(child) = row.first().and_then(Value::as_str) else {
                continue;
            };
            let stoichiometry = row.get(1).and_then(Value::as_u64).unwrap_or(1).max(1);
            for _ in 0..stoichiometry {
                children.push(StId::from(child));
            }
        }
        Ok(children)
    }

    fn catalysts(&self, id: &StId) -> std::result::Result<Vec<CatalystActivity>, GraphError> {
        let rows = self.query(
            "MATCH (n:DatabaseObject {stId: $stId})-[:catalystActivity]->(ca)-[:physicalEntity]->(pe) \
             RETURN pe.stId, [(ca)-[:activeUnit]->(au) | au.stId]",
            json!({ "stId": id.as_str() }),
        )?;

        let mut catalysts = Vec::new();
        for row in rows {
            let Some(physical_entity) = row.first().and_then(Value::as_str) else {
                continue;
            };
            let active_units = row
                .get(1)
                .and_then(Value::as_array)
                .map(|units| {
                    units
                        .iter()
                        .filter_map(Value::as_str)
                        .map(StId::from)
                        .collect()
                })
                .unwrap_or_default();
            catalysts.push(CatalystActivity {
                physical_entity: StId::from(physical_entity),
                active_units,
            });
        }
        Ok(catalysts)
    }
}

fn parse_rows(text: &str) -> std::result::Result<Vec<Vec<Value>>, GraphError> {
    let parsed: TxResponse = serde_json::from_str(text).map_err(|e| GraphError::Backend {
        message: format!("malformed transaction response: {e}"),
    })?;
    if let Some(error) = parsed.errors.first() {
        return Err(GraphError::Backend {
            message: format!("{}: {}", error.code, error.message),
        });
    }
    Ok(parsed
        .results
        .into_iter()
        .flat_map(|result| result.data)
        .map(|data| data.row)
        .collect())
}

impl EntityGraph for RemoteGraph {
    fn entity(&self, id: &StId) -> std::result::Result<Entity, GraphError> {
        let rows = self.query(
            "MATCH (n:DatabaseObject {stId: $stId}) \
             RETURN n.stId, n.displayName, n.schemaClass, \
             [(n)-[:compartment]->(c) | c.displayName][0], \
             [(n)-[:referenceEntity]->(re) | re.databaseName + ':' + re.identifier][0]",
            json!({ "stId": id.as_str() }),
        )?;
        let Some(row) = rows.into_iter().next() else {
            return Err(GraphError::NotFound { id: id.clone() });
        };

        let name = row
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or(id.as_str())
            .to_string();
        let schema_class = row.get(2).and_then(Value::as_str).unwrap_or("").to_string();
        let compartment = row.get(3).and_then(Value::as_str).map(str::to_string);
        let reference = row.get(4).and_then(Value::as_str).map(str::to_string);

        let kind = match schema_class.as_str() {
            "SimpleEntity" => EntityKind::SimpleEntity { reference },
            "EntityWithAccessionedSequence" => EntityKind::AccessionedSequence {
                accession: reference,
            },
            "Complex" => EntityKind::Complex {
                components: self.child_ids(id, "hasComponent")?,
            },
            "EntitySet" | "DefinedSet" | "CandidateSet" | "OpenSet" => EntityKind::Set {
                members: self.child_ids(id, "hasMember")?,
            },
            "Polymer" => EntityKind::Polymer {
                repeated_units: self.child_ids(id, "repeatedUnit")?,
            },
            "Reaction" | "BlackBoxEvent" | "Polymerisation" | "Depolymerisation"
            | "FailedReaction" => EntityKind::Reaction {
                inputs: self.child_ids(id, "input")?,
                catalysts: self.catalysts(id)?,
            },
            _ => EntityKind::Other,
        };

        let mut entity = Entity::new(id.clone(), name, kind);
        entity.compartment = compartment;
        Ok(entity)
    }

    fn species_names(&self) -> std::result::Result<Vec<String>, GraphError> {
        let rows = self.query(
            "MATCH (s:Species) RETURN s.displayName ORDER BY s.displayName",
            json!({}),
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.first().and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    fn species_display_name(&self, name: &str) -> std::result::Result<String, GraphError> {
        let rows = self.query(
            "MATCH (s:Species) WHERE s.displayName = $name OR $name IN coalesce(s.name, []) \
             RETURN s.displayName LIMIT 1",
            json!({ "name": name }),
        )?;
        rows.into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| GraphError::UnknownSpecies {
                name: name.to_string(),
            })
    }

    fn roots_for_species(&self, species: &str) -> std::result::Result<Vec<StId>, GraphError> {
        let rows = self.query(
            "MATCH (n:DatabaseObject {speciesName: $name}) \
             WHERE n:ReactionLikeEvent OR n:Complex OR n:Polymer \
             RETURN n.stId ORDER BY n.stId",
            json!({ "name": species }),
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|value| value.as_str().map(StId::from))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_flatten_across_results() {
        let text = r#"{
            "results": [
                { "columns": ["stId"], "data": [
                    { "row": ["R-HSA-1", 2], "meta": [null] },
                    { "row": ["R-HSA-2", 1], "meta": [null] }
                ] }
            ],
            "errors": []
        }"#;

        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].as_str(), Some("R-HSA-1"));
        assert_eq!(rows[0][1].as_u64(), Some(2));
    }

    #[test]
    fn store_errors_surface_as_backend_failures() {
        let text = r#"{
            "results": [],
            "errors": [
                { "code": "Neo.ClientError.Statement.SyntaxError", "message": "bad query" }
            ]
        }"#;

        let error = parse_rows(text).unwrap_err();
        assert!(matches!(error, GraphError::Backend { message } if message.contains("bad query")));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(parse_rows("not json").is_err());
    }
}
