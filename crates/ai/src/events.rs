//! Chat lifecycle events.
//!
//! The orchestrator reports what happened to each request through a
//! [`ChatEventSink`]. The core only knows the `log` facade; hosts that use
//! `tracing` plug in their own sink.

use crate::types::ChatErrorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Started {
        user_id: String,
        template_requested: bool,
    },
    Succeeded {
        user_id: String,
        model: String,
        processing_time_ms: u64,
    },
    Failed {
        user_id: String,
        kind: ChatErrorKind,
        message: String,
    },
}

pub trait ChatEventSink: Send + Sync {
    fn record(&self, event: ChatEvent);
}

/// Default sink writing through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl ChatEventSink for LogEventSink {
    fn record(&self, event: ChatEvent) {
        match event {
            ChatEvent::Started {
                user_id,
                template_requested,
            } => {
                log::debug!(
                    "chat started user={} template_requested={}",
                    user_id,
                    template_requested
                );
            }
            ChatEvent::Succeeded {
                user_id,
                model,
                processing_time_ms,
            } => {
                log::info!(
                    "chat succeeded user={} model={} elapsed_ms={}",
                    user_id,
                    model,
                    processing_time_ms
                );
            }
            ChatEvent::Failed {
                user_id,
                kind,
                message,
            } => {
                if kind == ChatErrorKind::Internal {
                    log::error!("chat failed user={} kind={} {}", user_id, kind, message);
                } else {
                    log::warn!("chat failed user={} kind={} {}", user_id, kind, message);
                }
            }
        }
    }
}
