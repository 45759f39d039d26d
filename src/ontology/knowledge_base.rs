/// A science field with the methods, tools and facets it brings to a prompt.
#[derive(Debug)]
pub struct ScienceField {
    pub name: &'static str,
    pub category: &'static str,
    pub methods: &'static [&'static str],
    pub tools: &'static [&'static str],
    pub facets: &'static [&'static str],
}

/// `(name, description)` pairs.
pub const PROFILES: &[(&str, &str)] = &[
    ("Adventurers", "Explorers of hidden patterns."),
    ("Applicators", "Efficiency focused."),
    ("Know-it-alls", "Systemic clarity."),
    ("Observers", "System monitors."),
];

pub const PARADIGMS: &[(&str, &str)] = &[
    ("Empiricism", "Sensory experience."),
    ("Rationalism", "Deductive logic."),
    ("Constructivism", "Social build."),
    ("Positivism", "Strict facts."),
    ("Pragmatism", "Practical utility."),
];

pub const STRUCTURAL_MODELS: &[(&str, &str)] = &[
    ("Causal Connections", "Causality."),
    ("Principles & Relations", "Fundamental laws."),
    ("Episodes & Sequences", "Time-flow."),
    ("Facts & Characteristics", "Raw data."),
    ("Generalizations", "Frameworks."),
    ("Glossary", "Definitions."),
    ("Concepts", "Abstract constructs."),
];

pub const GOAL_CONTEXTS: &[&str] = &[
    "Scientific Research",
    "Problem Solving",
    "Educational",
    "Policy Making",
];

const fn field(
    name: &'static str,
    category: &'static str,
    methods: &'static [&'static str],
    tools: &'static [&'static str],
    facets: &'static [&'static str],
) -> ScienceField {
    ScienceField {
        name,
        category,
        methods,
        tools,
        facets,
    }
}

pub static SCIENCE_FIELDS: &[ScienceField] = &[
    field("Physics", "Natural", &["Modeling", "Simulation"], &["Accelerator", "Spectrometer"], &["Quantum", "Relativity"]),
    field("Chemistry", "Natural", &["Synthesis", "Spectroscopy"], &["NMR", "Chromatography"], &["Organic", "Molecular"]),
    field("Biology", "Natural", &["Sequencing", "CRISPR"], &["Microscope", "Bio-Incubator"], &["Genetics", "Ecology"]),
    field("Neuroscience", "Natural", &["Neuroimaging", "Electrophys"], &["fMRI", "EEG"], &["Plasticity", "Synaptic"]),
    field("Psychology", "Social", &["Double-Blind Trials", "Psychometrics"], &["fMRI", "Testing Kits"], &["Behavioral", "Cognitive"]),
    field("Sociology", "Social", &["Ethnography", "Surveys"], &["Data Analytics", "Archives"], &["Stratification", "Dynamics"]),
    field("Computer Science", "Formal", &["Algorithm Design", "Verification"], &["LLMGraphTransformer", "GPU Clusters"], &["AI", "Cybersecurity"]),
    field("Psychiatry", "Applied/Medical", &["Diagnosis", "Clinical Trials"], &["DSM-5", "EEG"], &["Clinical Psychiatry", "Neuropsychiatry"]),
    field("Medicine", "Applied", &["Clinical Trials", "Epidemiology"], &["MRI/CT", "Bio-Markers"], &["Immunology", "Pharmacology"]),
    field("Engineering", "Applied", &["Prototyping", "FEA Analysis"], &["3D Printers", "CAD Software"], &["Robotics", "Nanotech"]),
    field("Library Science", "Applied", &["Taxonomy", "Appraisal"], &["OPAC", "Metadata"], &["Retrieval", "Knowledge Org"]),
    field("Philosophy", "Humanities", &["Socratic Method", "Phenomenology"], &["Logic Mapping", "Critical Analysis"], &["Epistemology", "Metaphysics"]),
    field("Linguistics", "Humanities", &["Corpus Analysis", "Syntactic Parsing"], &["Praat", "NLTK Toolkit"], &["Socioling", "CompLing"]),
    field("Geography", "Natural/Social", &["Spatial Analysis", "GIS"], &["ArcGIS"], &["Human Geo", "Physical Geo"]),
    field("Geology", "Natural", &["Stratigraphy", "Mineralogy"], &["Seismograph"], &["Tectonics", "Petrology"]),
    field("Climatology", "Natural", &["Climate Modeling"], &["Weather Stations"], &["Change Analysis"]),
    field("History", "Humanities", &["Archives"], &["Archives"], &["Social History"]),
    field(
        "Legal science",
        "Social",
        &["Legal Hermeneutics", "Comparative Law", "Dogmatic Method", "Empirical Legal Research"],
        &["Legislative Databases", "Case Law Archives", "Constitutional Records"],
        &["Jurisprudence", "Constitutional Law", "Criminal Law", "Civil Law"],
    ),
    field("Economics", "Social", &["Econometrics", "Game Theory", "Market Modeling"], &["Stata", "R", "Bloomberg"], &["Macroeconomics", "Behavioral Economics"]),
    field("Politics", "Social", &["Policy Analysis", "Comparative Politics"], &["Polls", "Legislative Databases"], &["International Relations", "Governance"]),
    field(
        "Criminology",
        "Social",
        &["Case Studies", "Statistical Analysis", "Profiling"],
        &["NCVS", "Crime Mapping Software"],
        &["Victimology", "Penology", "Criminal Behavior"],
    ),
    field(
        "Forensic sciences",
        "Applied/Natural",
        &["DNA Profiling", "Ballistics", "Trace Analysis"],
        &["Mass Spectrometer", "Luminol", "Comparison Microscope"],
        &["Toxicology", "Pathology", "Digital Forensics"],
    ),
];
