use crate::form::SynthesisForm;
use crate::ontology::{self, Metamodel};
use crate::pipeline::splitter::GRAPH_MARKER;

const IDEA_TRIGGERS: &[&str] = &[
    "use hierarchical associative logic and integrated metamodel architecture and mental approach logic",
    "create useful ideas",
    "innovative ideas",
];

const STRICT_HIERARCHY_TRIGGER: &str = "use strict hierarchical logic";
const RELATIONAL_TRIGGER: &str = "use relational logic";

/// Graph schema the model is asked to emit after the marker.
pub const GRAPH_SCHEMA: &str = r##"{"nodes": [{"id": "n1", "label": "Text", "type": "Root|Branch|Leaf|Class", "color": "#hex", "shape": "triangle|rectangle|ellipse|diamond"}], "edges": [{"source": "n1", "target": "n2", "rel_type": "BT|NT|AS|TT|outcome_of"}]}"##;

/// Which relation vocabulary the graph must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicMode {
    StrictHierarchical,
    Relational,
    HierarchicalAssociative,
}

impl LogicMode {
    /// Pick the logic mode from phrases in the inquiry.
    pub fn detect(inquiry: &str) -> Self {
        let lower = inquiry.to_lowercase();
        if lower.contains(STRICT_HIERARCHY_TRIGGER) {
            LogicMode::StrictHierarchical
        } else if lower.contains(RELATIONAL_TRIGGER) {
            LogicMode::Relational
        } else {
            LogicMode::HierarchicalAssociative
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LogicMode::StrictHierarchical => "Strict hierarchical logic",
            LogicMode::Relational => "Relational logic",
            LogicMode::HierarchicalAssociative => "Hierarchical associative logic",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            LogicMode::StrictHierarchical => {
                "Use EXCLUSIVELY hierarchical relations: TT (Top Term), BT (Broader Term), NT (Narrower Term). Focus on the vertical taxonomy."
            }
            LogicMode::Relational => {
                "Use EXCLUSIVELY lateral relations: AS (Associative), EQ (Equivalent), IN (Inheritance/Class). Focus on network connectedness."
            }
            LogicMode::HierarchicalAssociative => {
                "Use the COMPLETE set of relations: TT (Top Term), BT (Broader Term), NT (Narrower Term), RT (Related Term), AS (Associative), EQ (Equivalent) and IN (Inheritance/Instance)."
            }
        }
    }
}

impl std::fmt::Display for LogicMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// True when the inquiry asks for new ideas rather than plain synthesis.
pub fn is_idea_mode(inquiry: &str) -> bool {
    let lower = inquiry.to_lowercase();
    IDEA_TRIGGERS.iter().any(|t| lower.contains(t))
}

/// A fully assembled chat request body plus the modes it was built for.
#[derive(Debug, Clone)]
pub struct SynthesisPrompt {
    pub logic: LogicMode,
    pub idea_mode: bool,
    pub system: String,
    pub user: String,
}

impl SynthesisPrompt {
    /// Assemble the system and user messages for a normalized form.
    ///
    /// Metamodels are only injected in idea mode; `metamodels` selects which
    /// of them take part.
    pub fn build(form: &SynthesisForm, bibliography: &str, metamodels: &[Metamodel]) -> Self {
        let logic = LogicMode::detect(&form.inquiry);
        let idea_mode = is_idea_mode(&form.inquiry);

        let mut sections = vec![
            "You are the SIS Synthesizer. Perform an exhaustive dissertation (1500+ words).".to_string(),
            format!(
                "MANDATORY ARCHITECTURAL LOGIC: {}\n{}",
                logic.title(),
                logic.instruction()
            ),
        ];

        if idea_mode {
            sections.push(IDEA_PRODUCTION_MODE.to_string());
            sections.push(human_thinking_section(metamodels.contains(&Metamodel::HumanThinking)));
            sections.push(mental_approaches_section(
                metamodels.contains(&Metamodel::MentalApproaches),
            ));
        } else {
            sections.push(KNOWLEDGE_SYNTHESIS_MODE.to_string());
            sections.push(human_thinking_section(false));
            sections.push(mental_approaches_section(false));
        }

        sections.push(format!(
            "FIELDS: {}. CONTEXT AUTHORS: {}.",
            form.sciences.join(", "),
            bibliography
        ));
        sections.push(form_context(form));
        sections.push(format!(
            "THESAURUS ALGORITHM & UML LOGIC. Ensure dense interconnection.\n\n\
             GEOMETRICAL VISUALIZATION TASK:\n\
             - Analyze user inquiry for shape preferences. Default shape is 'ellipse'.\n\
             - Use colors and shapes from the contexts provided (Metamodel/Mental only if idea mode).\n\n\
             STRICT FORMATTING & SPACE ALLOCATION:\n\
             - Focus 100% of the textual content on deep research and interdisciplinary synergy.\n\
             - DO NOT explain the visualization in the text.\n\
             - End with '{GRAPH_MARKER}' followed by valid JSON only.\n\n\
             GRAPH DENSITY REQUIREMENT:\n\
             - GENERATE A DENSE SEMANTIC NETWORK WITH APPROXIMATELY 30-40 INTERCONNECTED NODES.\n\
             - Every node must strictly follow the Color/Shape logic from the contexts.\n\n\
             JSON schema: {GRAPH_SCHEMA}"
        ));

        Self {
            logic,
            idea_mode,
            system: sections.join("\n\n"),
            user: form.processed_query(),
        }
    }

    pub fn temperature(&self, synthesis: f64, ideas: f64) -> f64 {
        if self.idea_mode { ideas } else { synthesis }
    }
}

const IDEA_PRODUCTION_MODE: &str = "*** SUPERIOR IDEA PRODUCTION MODE ACTIVE ***
The user explicitly commanded 'Create useful ideas' or combined logic with Metamodel/Mental frameworks.
You are now expected to PERFORM KNOWLEDGE SYNTHESIS AND PRODUCE NEW USEFUL INNOVATIVE IDEAS.
Shift from descriptive analysis to RADICAL INNOVATION.
Use nodes like 'Conflict situation', 'Problem', and 'Mental approaches' (e.g., Perspective shifting, Bipolarity) to:
1. Forge entirely new cross-disciplinary theories.
2. Design novel solutions that don't exist in current literature.
3. Propose 'Useful Innovative Ideas' that solve the stated problem using the rules provided.
Your response must emphasize original conceptual synthesis AND generative creativity.";

const KNOWLEDGE_SYNTHESIS_MODE: &str = "*** KNOWLEDGE SYNTHESIS MODE ***
The user is looking for knowledge synthesis and structured organization.
Focus on structured analysis, taxonomy, and interconnectedness within the provided science fields.
DO NOT focus on producing hypothetical innovative ideas. Focus strictly on existing knowledge structures and their relationships.";

fn human_thinking_section(enabled: bool) -> String {
    if enabled {
        format!(
            "CORE METAMODEL INTEGRATION (MANDATORY): {}",
            ontology::HUMAN_THINKING.to_prompt_json()
        )
    } else {
        "In this mode, do not use the 'Human Thinking' metamodel.".to_string()
    }
}

fn mental_approaches_section(enabled: bool) -> String {
    if !enabled {
        return "In this mode, do not use the 'Mental Approach' logic. Focus purely on the domain-specific science fields selected.".to_string();
    }
    format!(
        "MENTAL APPROACHES DIAGRAM LOGIC (MANDATORY):\n\
         Incorporate the directional logic and inter-node connections defined here: {}.\n\
         Key structural paths to observe:\n\
         - 'Core' leads to 'Similarity and difference', 'Attraction', and 'Repulsion'.\n\
         - 'Repulsion' triggers 'Bipolarity and dialectics'.\n\
         - 'Induction' and 'Whole and part' are mutually dependent.\n\
         - 'Whole and part' flows into 'Mini-max'.\n\
         - 'Hierarchy' flows into 'Balance' which reconciles 'Addition and composition' and 'Abstraction and elimination'.\n\
         - 'Deduction' defines 'Hierarchy' and evaluates through 'Pleasure and displeasure'.",
        ontology::MENTAL_APPROACHES.to_prompt_json()
    )
}

/// The remaining form selections, with the science facets they imply.
fn form_context(form: &SynthesisForm) -> String {
    let list = |values: &[String]| {
        if values.is_empty() {
            "none".to_string()
        } else {
            values.join(", ")
        }
    };

    let facets: Vec<String> = form
        .sciences
        .iter()
        .filter_map(|s| ontology::science_field(s))
        .map(|f| format!("{} ({}): {}", f.name, f.category, f.facets.join(", ")))
        .collect();

    format!(
        "USER CONTEXT:\n\
         - Profiles: {}\n\
         - Expertise: {}\n\
         - Goal: {}\n\
         - Structural models: {}\n\
         - Paradigms: {}\n\
         - Mental approaches: {}\n\
         - Methodologies: {}\n\
         - Tools: {}\n\
         - Science facets: {}",
        list(&form.profiles),
        form.expertise,
        form.goal,
        list(&form.models),
        list(&form.paradigms),
        list(&form.approaches),
        list(&form.methods),
        list(&form.tools),
        list(&facets),
    )
}
