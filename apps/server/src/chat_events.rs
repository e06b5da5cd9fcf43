use quill_ai::{ChatErrorKind, ChatEvent, ChatEventSink};

/// Emits chat lifecycle events as structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingChatEvents;

impl ChatEventSink for TracingChatEvents {
    fn record(&self, event: ChatEvent) {
        match event {
            ChatEvent::Started {
                user_id,
                template_requested,
            } => {
                tracing::debug!(%user_id, template_requested, "chat started");
            }
            ChatEvent::Succeeded {
                user_id,
                model,
                processing_time_ms,
            } => {
                tracing::info!(%user_id, %model, processing_time_ms, "chat succeeded");
            }
            ChatEvent::Failed {
                user_id,
                kind,
                message,
            } => {
                let error_kind = kind.code();
                if kind == ChatErrorKind::Internal {
                    tracing::error!(%user_id, error_kind, %message, "chat failed");
                } else {
                    tracing::warn!(%user_id, error_kind, %message, "chat failed");
                }
            }
        }
    }
}
