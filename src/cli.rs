// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

pub mod chat;
pub mod copy;
pub mod export;
pub mod generate;
pub mod history;
pub mod key;
pub mod new;
pub mod preview;

use crate::{environment, session::Session};

/// The workspace's paper and conversation. Call after the environment is initialized.
fn load_session() -> eyre::Result<Session> {
    Session::load(environment::root_dir(), &environment::chat_path())
}

fn save_session(session: &Session) -> eyre::Result<()> {
    session.save(environment::root_dir(), &environment::chat_path())
}
