use super::{Concept, Ontology, Relation};

const fn concept(name: &'static str, color: &'static str) -> Concept {
    Concept {
        name,
        color,
        shape: "rectangle",
    }
}

const fn rel(from: &'static str, to: &'static str, label: &'static str) -> Relation {
    Relation { from, to, label }
}

/// "Basic Human Thinking" metamodel.
pub static HUMAN_THINKING: Ontology = Ontology {
    name: "Basic Human Thinking",
    concepts: &[
        concept("Human mental concentration", "#A6A6A6"),
        concept("Identity", "#C6EFCE"),
        concept("Autobiographical memory", "#C6EFCE"),
        concept("Mission", "#92D050"),
        concept("Vision", "#FFFF00"),
        concept("Goal", "#00B0F0"),
        concept("Problem", "#F2DCDB"),
        concept("Ethics/moral", "#FFC000"),
        concept("Hierarchy of interests", "#F8CBAD"),
        concept("Rule", "#F2F2F2"),
        concept("Decision-making", "#FFFF99"),
        concept("Problem solving", "#D9D9D9"),
        concept("Conflict situation", "#00FF00"),
        concept("Knowledge", "#DDEBF7"),
        concept("Tool", "#00B050"),
        concept("Experience", "#00B050"),
        concept("Classification", "#CCC0DA"),
        concept("Psychological aspect", "#F8CBAD"),
        concept("Sociological aspect", "#00FFFF"),
    ],
    relations: &[
        rel("Human mental concentration", "Identity", "has"),
        rel("Human mental concentration", "Mission", "can have"),
        rel("Identity", "Autobiographical memory", "has"),
        rel("Mission", "Vision", "can have"),
        rel("Vision", "Goal", "can have"),
        rel("Problem", "Identity", "threatens"),
        rel("Problem", "Mission", "impedes"),
        rel("Problem", "Vision", "impedes"),
        rel("Problem", "Goal", "threatens"),
        rel("Problem", "Ethics/moral", "has"),
        rel("Ethics/moral", "Problem", "can solve"),
        rel("Problem", "Rule", "can be connected"),
        rel("Hierarchy of interests", "Goal", "realizes"),
        rel("Hierarchy of interests", "Knowledge", "realizes or hinders"),
        rel("Rule", "Goal", "realizes or hinders"),
        rel("Rule", "Decision-making", "realizes or hinders"),
        rel("Knowledge", "Goal", "acquisition"),
        rel("Decision-making", "Problem solving", "realizes or hinders"),
        rel("Ethics/moral", "Problem solving", "helps or hinders"),
        rel("Problem", "Problem solving", "should"),
        rel("Problem solving", "Conflict situation", "yes or no"),
        rel("Knowledge", "Classification", "with the help of"),
        rel("Knowledge", "Tool", "with the help of"),
        rel("Knowledge", "Experience", "with the help of"),
        rel("Experience", "Psychological aspect", "can be the outcome"),
        rel("Experience", "Sociological aspect", "can be the outcome"),
        rel("Conflict situation", "Psychological aspect", "can be the outcome"),
        rel("Conflict situation", "Sociological aspect", "can be the outcome"),
        rel("Psychological aspect", "Sociological aspect", "interconnected"),
    ],
};

/// Mental approaches diagram.
pub static MENTAL_APPROACHES: Ontology = Ontology {
    name: "Mental Approaches",
    concepts: &[
        concept("Perspective shifting", "#00FF00"),
        concept("Similarity and difference", "#FFFF00"),
        concept("Core", "#FFC000"),
        concept("Attraction", "#F2A6A2"),
        concept("Repulsion", "#D9D9D9"),
        concept("Condensation", "#CCC0DA"),
        concept("Framework and foundation", "#F8CBAD"),
        concept("Bipolarity and dialectics", "#DDEBF7"),
        concept("Constant", "#E1C1D1"),
        concept("Associativity", "#E1C1D1"),
        concept("Induction", "#B4C6E7"),
        concept("Whole and part", "#00FF00"),
        concept("Mini-max", "#00FF00"),
        concept("Addition and composition", "#FF00FF"),
        concept("Hierarchy", "#C6EFCE"),
        concept("Balance", "#00B0F0"),
        concept("Deduction", "#92D050"),
        concept("Abstraction and elimination", "#00B0F0"),
        concept("Pleasure and displeasure", "#00FF00"),
        concept("Openness and closedness", "#FFC000"),
    ],
    relations: &[
        rel("Perspective shifting", "Similarity and difference", "leads to"),
        rel("Core", "Similarity and difference", "influences"),
        rel("Core", "Attraction", "has dynamic"),
        rel("Core", "Repulsion", "has dynamic"),
        rel("Repulsion", "Bipolarity and dialectics", "leads to"),
        rel("Framework and foundation", "Bipolarity and dialectics", "mutually interacts"),
        rel("Bipolarity and dialectics", "Constant", "stabilizes"),
        rel("Constant", "Associativity", "allows"),
        rel("Induction", "Whole and part", "bidirectional link"),
        rel("Induction", "Hierarchy", "structures"),
        rel("Whole and part", "Mini-max", "optimizes"),
        rel("Mini-max", "Addition and composition", "results in"),
        rel("Deduction", "Hierarchy", "defines taxonomy"),
        rel("Deduction", "Abstraction and elimination", "processes through"),
        rel("Deduction", "Pleasure and displeasure", "evaluates through"),
        rel("Hierarchy", "Balance", "maintains"),
        rel("Balance", "Addition and composition", "stabilizes"),
        rel("Balance", "Abstraction and elimination", "reconciles"),
        rel("Openness and closedness", "Pleasure and displeasure", "modulates response"),
    ],
};
