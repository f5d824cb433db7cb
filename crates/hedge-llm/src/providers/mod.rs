//! Oracle provider implementations

pub mod gemini;
