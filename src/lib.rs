//! Clearbill — hospital bill adjudication.
//!
//! A bill and its after-care summary come in as uploaded documents (PDF or
//! image), get normalized to plain text, and a local LLM reviews each billed
//! code against the documented care. The output is a per-code verdict sheet,
//! the recomputed savings total, and a draft appeal letter for the disputed
//! charges.
//!
//! Layering, outermost first:
//! - [`api`] — HTTP surface and wire projection
//! - [`analyzer`] — per-request orchestration (concurrent extraction, one
//!   adjudication join point)
//! - [`extraction`] — media-type dispatch, PDF text layer, OCR
//! - [`adjudication`] — the three-pass LLM review engine
//!
//! All inference runs against a local Ollama instance; no document content
//! leaves the machine.

pub mod adjudication;
pub mod analyzer;
pub mod api;
pub mod config;
pub mod document;
pub mod extraction;
