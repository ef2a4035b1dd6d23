// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Generation and chat flows over a paper record and its conversation.
//!
//! The record only changes when a flow succeeds; failures are reported in
//! the conversation and returned to the caller.

use camino::Utf8Path;
use thiserror::Error;

use crate::{
    chat::ChatHistory,
    provider::{
        prompt,
        response::{self, Reply},
        Provider, ProviderError,
    },
    record::PaperRecord,
};

pub const STARTED: &str = "✨ Starting research paper generation...";
pub const PAPER_DONE: &str = "✅ Paper complete! Now generating code...";
pub const ALL_DONE: &str = "✨ All done! Your paper and code are ready.";
pub const PAPER_UPDATED: &str = "✅ Paper updated successfully!";
pub const CODE_UPDATED: &str = "✅ Python code updated successfully!";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a title and a description are both required")]
    MissingInput,

    #[error("the message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Provider(ProviderError),

    #[error("Failed to generate paper: {0}")]
    Paper(ProviderError),

    #[error("Failed to generate code: {0}")]
    Code(ProviderError),

    #[error("Failed to process request: {0}")]
    Chat(ProviderError),
}

impl SessionError {
    /// A missing key is reported as is; anything else names the failed step.
    fn at(step: fn(ProviderError) -> SessionError) -> impl Fn(ProviderError) -> SessionError {
        move |error| match error {
            ProviderError::MissingApiKey(_) => SessionError::Provider(error),
            error => step(error),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub record: PaperRecord,
    pub history: ChatHistory,
}

impl Session {
    pub fn new(record: PaperRecord, history: ChatHistory) -> Self {
        Self { record, history }
    }

    pub fn load(root: &Utf8Path, history_path: &Utf8Path) -> eyre::Result<Self> {
        Ok(Self::new(PaperRecord::load(root)?, ChatHistory::load(history_path)))
    }

    pub fn save(&self, root: &Utf8Path, history_path: &Utf8Path) -> eyre::Result<()> {
        self.record.save(root)?;
        self.history.save(history_path)
    }

    /// Generate a paper and then its experiment code. `progress` receives a
    /// short description of each step.
    pub fn generate(
        &mut self,
        provider: &dyn Provider,
        title: &str,
        description: &str,
        progress: &dyn Fn(&str),
    ) -> Result<(), SessionError> {
        let (title, description) = (title.trim(), description.trim());
        if title.is_empty() || description.is_empty() {
            return Err(SessionError::MissingInput);
        }

        self.history.push_agent(STARTED);
        match self.run_generation(provider, title, description, progress) {
            Ok(record) => {
                self.record = record;
                self.history.push_agent(ALL_DONE);
                Ok(())
            }
            Err(error) => {
                log::error!("generation with {} failed: {}", provider.kind(), error);
                self.history.push_error(&error);
                Err(error)
            }
        }
    }

    fn run_generation(
        &mut self,
        provider: &dyn Provider,
        title: &str,
        description: &str,
        progress: &dyn Fn(&str),
    ) -> Result<PaperRecord, SessionError> {
        progress("Writing research paper...");
        let paper = provider
            .complete(&prompt::paper_request(title, description))
            .map_err(SessionError::at(SessionError::Paper))?;
        let latex_body = response::clean_latex(&paper);
        self.history.push_agent(PAPER_DONE);

        progress("Creating experiment code...");
        let code = provider
            .complete(&prompt::code_request(title, description, &latex_body))
            .map_err(SessionError::at(SessionError::Code))?;

        Ok(PaperRecord {
            title: title.to_string(),
            description: description.to_string(),
            latex_body,
            python_code: response::clean_python(&code),
        })
    }

    /// Send a follow-up message. A reply that is LaTeX replaces the paper, a
    /// reply that is Python replaces the code, anything else is an answer.
    pub fn chat(&mut self, provider: &dyn Provider, message: &str) -> Result<Reply, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.history.push_user(message);

        let chat_prompt = prompt::chat_prompt(message, &self.record.latex_body, &self.record.python_code);
        log::debug!("chat intent: {:?}", chat_prompt.intent);
        let text = match provider.complete(&chat_prompt.request()) {
            Ok(text) => text,
            Err(error) => {
                let error = SessionError::at(SessionError::Chat)(error);
                self.history.push_error(&error);
                return Err(error);
            }
        };

        let reply = response::classify(&text);
        match &reply {
            Reply::Latex(latex) => {
                self.record.latex_body = latex.clone();
                self.history.push_agent(PAPER_UPDATED);
            }
            Reply::Python(code) => {
                self.record.python_code = code.clone();
                self.history.push_agent(CODE_UPDATED);
            }
            Reply::Answer(answer) => self.history.push_agent(answer.clone()),
        }
        Ok(reply)
    }
}
