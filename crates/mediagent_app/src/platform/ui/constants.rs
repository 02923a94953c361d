pub const TITLE: &str = "MediAgent";
pub const SUBTITLE: &str = "Multi-Agent Medical Diagnosis System";
pub const TAGLINE: &str =
    "Upload your medical report for comprehensive analysis by specialized AI agents";

pub const LABEL_UPLOAD: &str = "Upload Medical Report (.txt file)";
pub const LABEL_FILE_HINT: &str = "TXT files only";
pub const LABEL_SELECTED: &str = "Selected:";

pub const BUTTON_ANALYZE: &str = "Analyze Report";
pub const BUTTON_PROCESSING: &str = "Processing...";
pub const BUTTON_UPLOAD_ANOTHER: &str = "Analyze another report";

pub const RESULTS_TITLE: &str = "Diagnosis Results";
pub const RESULTS_REPORT: &str = "Report:";
pub const RESULTS_EMPTY: &str = "No diagnosis found. Please upload a report first.";

pub const PROMPT_PATH: &str = "Report path (.txt, empty line to quit): ";

pub const HOW_IT_WORKS_TITLE: &str = "How it works:";
pub const HOW_IT_WORKS: [&str; 4] = [
    "Upload your medical report in .txt format",
    "Specialized AI agents (Cardiologist, Psychologist, Pulmonologist) analyze the report",
    "A multidisciplinary team synthesizes a comprehensive diagnosis",
    "View detailed results with recommendations",
];

pub const RULE_WIDTH: usize = 60;
