use crate::{ReportFile, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the selected file to the diagnosis backend.
    ProcessFile { request_id: RequestId, file: ReportFile },
    /// Send raw report text to the diagnosis backend.
    ProcessText { request_id: RequestId, text: String },
    /// Hand the diagnosis to the results view through session storage.
    StoreSession { diagnosis: String, filename: String },
    Navigate(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Upload,
    Results,
}
