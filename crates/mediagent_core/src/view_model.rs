use crate::Route;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub route: Route,
    pub upload: UploadView,
    pub results: Option<ResultsView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub selected_file: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    /// File picker enabled.
    pub can_select: bool,
    /// Analyze button enabled.
    pub can_submit: bool,
}

/// What the results view found in session storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsView {
    pub filename: Option<String>,
    pub diagnosis: Option<String>,
}
