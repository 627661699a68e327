/// Mime type Telegram reports for `.xlsx` uploads.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Which conversational phase a chat is in.
///
/// A chat that never sent /start has no session at all (`None` in the
/// transition table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Session {
    AwaitingQuery,
    AwaitingFile,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::AwaitingQuery => "AwaitingQuery",
            Session::AwaitingFile => "AwaitingFile",
        }
    }
}

/// An incoming message, already classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start { first_name: Option<String> },
    UpdateFileCommand,
    Text(String),
    Document {
        file_id: String,
        mime_type: Option<String>,
        file_name: Option<String>,
    },
}

/// Side effects the controller performs for one event, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Greet { first_name: Option<String> },
    NeedRestart,
    AwaitFile,
    Lookup(String),
    Countdown,
    SaveDataset { file_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: Option<Session>,
    pub actions: Vec<Action>,
}

impl Transition {
    fn to(next: Option<Session>, actions: Vec<Action>) -> Self {
        Self { next, actions }
    }

    fn stay(current: Option<Session>) -> Self {
        Self::to(current, Vec::new())
    }
}

/// The conversation's transition table. Pure: the caller owns the state.
pub fn transition(current: Option<Session>, event: Event) -> Transition {
    use Session::*;

    match (current, event) {
        (_, Event::Start { first_name }) => {
            Transition::to(Some(AwaitingQuery), vec![Action::Greet { first_name }])
        }

        (None, Event::Text(_)) | (None, Event::UpdateFileCommand) => {
            Transition::to(None, vec![Action::NeedRestart])
        }

        (Some(AwaitingQuery), Event::Text(query)) => Transition::to(
            Some(AwaitingQuery),
            vec![Action::Lookup(query), Action::Countdown],
        ),
        (Some(AwaitingQuery), Event::UpdateFileCommand) => {
            Transition::to(Some(AwaitingFile), vec![Action::AwaitFile])
        }

        (Some(AwaitingFile), Event::Document { file_id, mime_type, .. })
            if mime_type.as_deref() == Some(XLSX_MIME_TYPE) =>
        {
            Transition::to(Some(AwaitingQuery), vec![Action::SaveDataset { file_id }])
        }
        (Some(AwaitingFile), Event::Text(_)) | (Some(AwaitingFile), Event::UpdateFileCommand) => {
            Transition::to(Some(AwaitingFile), vec![Action::NeedRestart])
        }

        // documents outside the upload step, or of the wrong type, are ignored
        (state, Event::Document { .. }) => Transition::stay(state),
    }
}
