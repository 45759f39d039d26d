//! Static ontologies injected into synthesis prompts.
//!
//! Two hand-authored metamodels (concepts with a color and shape, plus
//! directed labelled relations) and the knowledge base that drives the form:
//! user profiles, paradigms, structural models and science fields.

mod knowledge_base;
mod metamodels;

use clap::ValueEnum;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

pub use knowledge_base::{
    GOAL_CONTEXTS, PARADIGMS, PROFILES, SCIENCE_FIELDS, STRUCTURAL_MODELS, ScienceField,
};
pub use metamodels::{HUMAN_THINKING, MENTAL_APPROACHES};

/// A metamodel concept with the colour and shape the graph should reuse.
#[derive(Debug, Clone, Copy)]
pub struct Concept {
    pub name: &'static str,
    pub color: &'static str,
    pub shape: &'static str,
}

/// A directed relation `(from, to, label)` between two concepts.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub from: &'static str,
    pub to: &'static str,
    pub label: &'static str,
}

/// A hand-authored ontology.
#[derive(Debug)]
pub struct Ontology {
    pub name: &'static str,
    pub concepts: &'static [Concept],
    pub relations: &'static [Relation],
}

impl Ontology {
    pub fn concept_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.concepts.iter().map(|c| c.name)
    }

    /// Compact JSON as embedded in prompts:
    /// `{"nodes": {name: {"color", "shape"}}, "relations": [[from, to, label]]}`.
    pub fn to_prompt_json(&self) -> String {
        // Serializing straight to a string keeps concept order stable.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for Ontology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Concepts(&'static [Concept]);

        impl Serialize for Concepts {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for concept in self.0 {
                    map.serialize_entry(concept.name, &Style(concept))?;
                }
                map.end()
            }
        }

        struct Style<'a>(&'a Concept);

        impl Serialize for Style<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut s = serializer.serialize_struct("Style", 2)?;
                s.serialize_field("color", self.0.color)?;
                s.serialize_field("shape", self.0.shape)?;
                s.end()
            }
        }

        let relations: Vec<[&str; 3]> = self
            .relations
            .iter()
            .map(|r| [r.from, r.to, r.label])
            .collect();

        let mut s = serializer.serialize_struct("Ontology", 2)?;
        s.serialize_field("nodes", &Concepts(self.concepts))?;
        s.serialize_field("relations", &relations)?;
        s.end()
    }
}

/// Selectable metamodels for idea-production prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, serde::Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metamodel {
    HumanThinking,
    MentalApproaches,
}

impl Metamodel {
    pub fn ontology(self) -> &'static Ontology {
        match self {
            Metamodel::HumanThinking => &HUMAN_THINKING,
            Metamodel::MentalApproaches => &MENTAL_APPROACHES,
        }
    }

    pub fn all() -> Vec<Metamodel> {
        vec![Metamodel::HumanThinking, Metamodel::MentalApproaches]
    }
}

impl std::fmt::Display for Metamodel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metamodel::HumanThinking => write!(f, "human-thinking"),
            Metamodel::MentalApproaches => write!(f, "mental-approaches"),
        }
    }
}

/// Names of all mental approaches, as offered in the form.
pub fn mental_approaches() -> impl Iterator<Item = &'static str> {
    MENTAL_APPROACHES.concept_names()
}

pub fn science_field(name: &str) -> Option<&'static ScienceField> {
    SCIENCE_FIELDS.iter().find(|f| f.name == name)
}

/// Science field names in alphabetical order.
pub fn sorted_science_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SCIENCE_FIELDS.iter().map(|f| f.name).collect();
    names.sort_unstable();
    names
}

/// Sorted, de-duplicated methods and tools offered by the given sciences.
pub fn methods_and_tools(sciences: &[String]) -> (Vec<&'static str>, Vec<&'static str>) {
    let mut methods = Vec::new();
    let mut tools = Vec::new();
    for field in sciences.iter().filter_map(|s| science_field(s)) {
        methods.extend_from_slice(field.methods);
        tools.extend_from_slice(field.tools);
    }
    for list in [&mut methods, &mut tools] {
        list.sort_unstable();
        list.dedup();
    }
    (methods, tools)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn has_concept(ontology: &Ontology, name: &str) -> bool {
        ontology.concepts.iter().any(|c| c.name == name)
    }

    #[test]
    fn test_relations_reference_known_concepts() {
        for metamodel in Metamodel::all() {
            let ontology = metamodel.ontology();
            for r in ontology.relations {
                assert!(has_concept(ontology, r.from), "{}: {}", ontology.name, r.from);
                assert!(has_concept(ontology, r.to), "{}: {}", ontology.name, r.to);
            }
        }
    }

    #[test]
    fn test_concept_names_unique() {
        for metamodel in Metamodel::all() {
            let ontology = metamodel.ontology();
            let names: HashSet<_> = ontology.concept_names().collect();
            assert_eq!(names.len(), ontology.concepts.len());
        }
    }

    #[test]
    fn test_prompt_json_keeps_order_and_layout() {
        let json = HUMAN_THINKING.to_prompt_json();
        assert!(json.starts_with(
            r##"{"nodes":{"Human mental concentration":{"color":"#A6A6A6","shape":"rectangle"},"Identity""##
        ));
        assert!(json.contains(r#"["Problem","Identity","threatens"]"#));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_object().unwrap().len(), 19);
        assert_eq!(value["relations"].as_array().unwrap().len(), 29);
    }

    #[test]
    fn test_mental_approaches_listed() {
        let names: Vec<_> = mental_approaches().collect();
        assert_eq!(names.len(), 20);
        assert_eq!(names[0], "Perspective shifting");
    }

    #[test]
    fn test_methods_and_tools_are_deduplicated() {
        let (methods, tools) =
            methods_and_tools(&["Psychology".to_string(), "Neuroscience".to_string()]);
        assert_eq!(tools.iter().filter(|t| **t == "fMRI").count(), 1);
        assert!(methods.contains(&"Psychometrics"));
        assert!(methods.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unknown_science_contributes_nothing() {
        let (methods, tools) = methods_and_tools(&["Alchemy".to_string()]);
        assert!(methods.is_empty());
        assert!(tools.is_empty());
    }
}
