pub mod html;
pub mod url;

pub use html::{extract_from_html, Tier};
pub use url::{validate_url, Orchestrator};

use log::debug;

/// Where an extraction request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ValidateUrl,
    InstagramBranch,
    FetchBranch,
    JsonLdHit,
    HeuristicFallback,
    Done,
    Failed,
}

/// What just happened to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Begin,
    InstagramUrl,
    WebUrl,
    CaptionParsed,
    StructuredData,
    NoStructuredData,
    Extracted,
    Error,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

/// The complete transition table. Terminal stages absorb every event; an
/// event that does not belong to the current stage fails the request.
pub fn transition(stage: Stage, event: Event) -> Stage {
    use Event::*;
    use Stage::*;

    match (stage, event) {
        _ if stage.is_terminal() => stage,
        (_, Error) => Failed,
        (Start, Begin) => ValidateUrl,
        (ValidateUrl, InstagramUrl) => InstagramBranch,
        (ValidateUrl, WebUrl) => FetchBranch,
        (InstagramBranch, CaptionParsed) => Done,
        (FetchBranch, StructuredData) => JsonLdHit,
        (FetchBranch, NoStructuredData) => HeuristicFallback,
        (JsonLdHit | HeuristicFallback, Extracted) => Done,
        _ => Failed,
    }
}

/// Stage tracker for one request; logs every transition.
#[derive(Debug)]
pub struct Run<'a> {
    source: &'a str,
    stage: Stage,
}

impl<'a> Run<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            stage: Stage::Start,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, event: Event) -> Stage {
        if self.stage.is_terminal() {
            debug!(
                "Pipeline [{}]: {:?} ignored in {:?}",
                self.source, event, self.stage
            );
            return self.stage;
        }
        let next = transition(self.stage, event);
        debug!(
            "Pipeline [{}]: {:?} --{:?}--> {:?}",
            self.source, self.stage, event, next
        );
        self.stage = next;
        next
    }
}
