#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file; `None` when the picker was dismissed.
    FileSelected(Option<crate::ReportFile>),
    /// The platform failed to read the picked path.
    FileUnreadable { name: String, reason: String },
    /// User clicked Analyze Report.
    SubmitClicked,
    /// User submitted report text directly instead of a file.
    ReportTextSubmitted(String),
    /// Backend reply (or failure message) for a submission.
    DiagnosisReceived {
        request_id: crate::RequestId,
        result: Result<crate::DiagnosisReply, String>,
    },
    /// Results view read the session store after navigation.
    ResultsLoaded {
        diagnosis: Option<String>,
        filename: Option<String>,
    },
    /// User left the results view to analyze another report.
    UploadAnotherClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
