//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log every API interaction passing through the [`Gemini`](crate::Gemini)
//! client.

use crate::{Error, GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// Implement this trait to capture and record all API interactions.
///
/// # Example
///
/// ```rust,ignore
/// use gemchat::{ClientLogger, Error, GenerateContentRequest, GenerateContentResponse, Model};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model} <- {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, model: &Model, response: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model} -> {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successfully parsed response.
    fn log_response(&self, model: &Model, response: &GenerateContentResponse);

    /// Log a failed call.
    fn log_error(&self, model: &Model, error: &Error) {
        _ = model;
        _ = error;
    }
}
