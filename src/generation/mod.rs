// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text generation through a hosted chat-completion API

pub mod client;

pub use client::{
    CompletionClient, CompletionConfig, GenerationError, TextGenerator, ERROR_PREFIX,
    NO_RESPONSE,
};
