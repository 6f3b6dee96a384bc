//! Dependency graph and relationship derivation over registered classes

use crate::contract::{FieldDefinition, FieldType, RegistryError, Relationship, RelationshipType};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A registered class name with its declared fields
pub type ClassFields<'a> = (&'a str, &'a IndexMap<String, FieldDefinition>);

/// Class name -> classes it depends on through foreign keys
pub type DependencyGraph = IndexMap<String, Vec<String>>;

/// Class name -> relationships grouped by source (or target for the inverse view)
pub type RelationshipMap = IndexMap<String, Vec<Relationship>>;

/// Resolve a related name to a registered class name: exact match, then case-insensitive
fn resolve_target<'a>(classes: &[ClassFields<'a>], related: &str) -> Option<&'a str> {
    classes
        .iter()
        .find(|(name, _)| *name == related)
        .or_else(|| classes.iter().find(|(name, _)| name.eq_ignore_ascii_case(related)))
        .map(|(name, _)| *name)
}

/// Build the foreign-key dependency graph.
///
/// Every class is a node, in registration order. Targets that are not
/// registered are left out.
pub fn build_graph(classes: &[ClassFields<'_>]) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(classes.len());

    for (class_name, fields) in classes {
        let mut deps: Vec<String> = Vec::new();
        for field in fields.values() {
            if field.field_type != FieldType::ForeignKey {
                continue;
            }
            let Some(related) = field.options.related.as_deref() else {
                continue;
            };
            match resolve_target(classes, related) {
                Some(target) => {
                    if !deps.iter().any(|d| d == target) {
                        deps.push(target.to_string());
                    }
                }
                None => {
                    tracing::debug!(
                        class = %class_name,
                        field = %field.name,
                        related = %related,
                        "Skipping dependency on unregistered class"
                    );
                }
            }
        }
        graph.insert(class_name.to_string(), deps);
    }

    graph
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Order classes so that every dependency precedes its dependents.
///
/// Depth-first, post-order; ties follow graph insertion order.
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<String>, RegistryError> {
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(graph.len());
    let mut order = Vec::with_capacity(graph.len());

    for node in graph.keys() {
        visit(node, graph, &mut marks, &mut order)?;
    }

    Ok(order)
}

fn visit<'g>(
    node: &'g str,
    graph: &'g DependencyGraph,
    marks: &mut HashMap<&'g str, Mark>,
    order: &mut Vec<String>,
) -> Result<(), RegistryError> {
    match marks.get(node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(RegistryError::CircularDependency {
                class: node.to_string(),
            })
        }
        None => {}
    }

    marks.insert(node, Mark::InProgress);
    if let Some(deps) = graph.get(node) {
        for dep in deps {
            visit(dep, graph, marks, order)?;
        }
    }
    marks.insert(node, Mark::Done);
    order.push(node.to_string());

    Ok(())
}

/// Relationships of every class, grouped by source class.
///
/// Relationships whose target is not registered are omitted.
pub fn relationship_map(classes: &[ClassFields<'_>]) -> RelationshipMap {
    let mut map = RelationshipMap::new();

    for (class_name, fields) in classes {
        for field in fields.values() {
            let Some(relationship_type) = RelationshipType::from_field_type(field.field_type) else {
                continue;
            };
            let Some(target) = field
                .options
                .related
                .as_deref()
                .and_then(|related| resolve_target(classes, related))
            else {
                continue;
            };

            map.entry(class_name.to_string()).or_default().push(Relationship {
                source_class: class_name.to_string(),
                field_name: field.name.clone(),
                target_class: target.to_string(),
                relationship_type,
                options: field.options.clone(),
            });
        }
    }

    map
}

/// The same edges grouped by target class
pub fn inverse_relationship_map(map: &RelationshipMap) -> RelationshipMap {
    let mut inverse = RelationshipMap::new();
    for relationship in map.values().flatten() {
        inverse
            .entry(relationship.target_class.clone())
            .or_default()
            .push(relationship.clone());
    }
    inverse
}
