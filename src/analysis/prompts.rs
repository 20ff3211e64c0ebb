// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt templates sent to the text generator

/// Stand-in for the object list when the detector found nothing
pub const UNKNOWN_OBJECT: &str = "an unknown object";

/// Join detected labels for interpolation into a prompt
pub fn objects_phrase<S: AsRef<str>>(objects: &[S]) -> String {
    if objects.is_empty() {
        return UNKNOWN_OBJECT.to_string();
    }
    objects
        .iter()
        .map(|o| o.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn paragraph_prompt(objects: &str, scene: &str) -> String {
    format!("Write a short paragraph about {} in a {}.", objects, scene)
}

pub fn poem_prompt(objects: &str, scene: &str) -> String {
    format!("Write a short poem about {} in a {}.", objects, scene)
}
