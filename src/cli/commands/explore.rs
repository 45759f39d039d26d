use anyhow::Result;
use console::{Emoji, style};

use crate::cli::ExploreSection;
use crate::form::SessionState;
use crate::ontology::{self, GOAL_CONTEXTS, Metamodel, PARADIGMS, PROFILES, STRUCTURAL_MODELS};

static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static PERSON: Emoji<'_, '_> = Emoji("👤 ", "");
static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
static GLOBE: Emoji<'_, '_> = Emoji("🌍 ", "");
static MICROSCOPE: Emoji<'_, '_> = Emoji("🔬 ", "");
static BUILDING: Emoji<'_, '_> = Emoji("🏗️  ", "");
static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
static GUIDE: Emoji<'_, '_> = Emoji("📖 ", "");

const USER_GUIDE: &[&str] = &[
    "API Key: run 'ksynth auth' or export GROQ_API_KEY to connect the model. Keys stay on this machine.",
    "Minimal Config: Physics, Psychology and Sociology are pre-selected; override with --science.",
    "Authors: pass --authors to fetch ORCID / Semantic Scholar bibliographies (with publication years).",
    "Metamodel Logic: say 'create useful ideas' in the inquiry to integrate the 'Basic Human Thinking' and 'Mental Approaches' metamodels.",
    "Relation logic: 'use strict hierarchical logic' (TT, BT, NT) or 'use relational logic' (AS, EQ, IN); the default mixes all relations.",
    "Semantic Graph: the HTML report shows colorful nodes linked to their first mention in the text.",
    "Export PNG: use the 💾 button in the report to save the graph image.",
    "Offline: 'ksynth synth --save-response raw.txt' keeps the model answer; 'ksynth render raw.txt' re-renders it.",
];

pub async fn run(
    section: Option<ExploreSection>,
    science: Option<String>,
    guide: bool,
    session: &mut SessionState,
) -> Result<()> {
    println!();
    println!("{}", style(" ksynth - Knowledge Explorer ").bold().reverse());
    println!();

    if guide {
        session.toggle_user_guide();
    }
    if session.show_user_guide {
        print_guide();
    }

    if let Some(name) = science {
        return print_science(&name);
    }

    let sections = match section {
        Some(s) => vec![s],
        None if session.show_user_guide => Vec::new(),
        None => vec![
            ExploreSection::Profiles,
            ExploreSection::Approaches,
            ExploreSection::Paradigms,
            ExploreSection::Sciences,
            ExploreSection::Models,
            ExploreSection::Goals,
        ],
    };

    for section in sections {
        print_section(section);
        println!();
    }

    Ok(())
}

fn print_guide() {
    println!("{}{}", GUIDE, style("User Guide").bold());
    for (i, line) in USER_GUIDE.iter().enumerate() {
        println!("  {} {}", style(format!("{}.", i + 1)).cyan(), line);
    }
    println!();
}

fn print_described(entries: &[(&str, &str)]) {
    for (name, description) in entries {
        println!("  {}: {}", style(name).bold(), description);
    }
}

fn print_section(section: ExploreSection) {
    match section {
        ExploreSection::Profiles => {
            println!("{}{}", PERSON, style("User Profiles").bold().underlined());
            print_described(PROFILES);
        }
        ExploreSection::Approaches => {
            println!("{}{}", BRAIN, style("Mental Approaches").bold().underlined());
            for approach in ontology::mental_approaches() {
                println!("  • {}", approach);
            }
        }
        ExploreSection::Paradigms => {
            println!("{}{}", GLOBE, style("Scientific Paradigms").bold().underlined());
            print_described(PARADIGMS);
        }
        ExploreSection::Sciences => {
            println!("{}{}", MICROSCOPE, style("Science Fields").bold().underlined());
            for name in ontology::sorted_science_names() {
                println!("  • {}", style(name).bold());
            }
        }
        ExploreSection::Models => {
            println!("{}{}", BUILDING, style("Structural Models").bold().underlined());
            print_described(STRUCTURAL_MODELS);
        }
        ExploreSection::Goals => {
            println!("{}{}", TARGET, style("Context / Goal").bold().underlined());
            for goal in GOAL_CONTEXTS {
                println!("  • {}", goal);
            }
        }
        ExploreSection::Metamodels => {
            for metamodel in Metamodel::all() {
                let ontology = metamodel.ontology();
                println!(
                    "{}{} {}",
                    LINK,
                    style(ontology.name).bold().underlined(),
                    style(format!("(--metamodel {})", metamodel)).dim()
                );
                for relation in ontology.relations {
                    println!(
                        "  {} {} {}",
                        relation.from,
                        style(format!("--{}-->", relation.label)).cyan(),
                        relation.to
                    );
                }
                println!();
            }
        }
    }
}

fn print_science(name: &str) -> Result<()> {
    let Some(field) = ontology::sorted_science_names()
        .into_iter()
        .find(|n| n.eq_ignore_ascii_case(name.trim()))
        .and_then(ontology::science_field)
    else {
        anyhow::bail!(
            "Unknown science field '{}'. Valid options: {}",
            name,
            ontology::sorted_science_names().join(", ")
        );
    };

    println!(
        "{}{} {}",
        BOOKS,
        style(field.name).bold().underlined(),
        style(format!("({})", field.category)).dim()
    );
    println!("  {}: {}", style("Methodologies").bold(), field.methods.join(", "));
    println!("  {}: {}", style("Tools").bold(), field.tools.join(", "));
    println!("  {}: {}", style("Facets").bold(), field.facets.join(", "));
    println!();
    Ok(())
}
