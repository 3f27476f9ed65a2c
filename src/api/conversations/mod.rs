pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{__path_append_message, __path_get_conversation, append_message, get_conversation, init_routes};

pub use structures::{
    AppendMessageRequest, AppendMessageResponse, ConversationMessageView, ConversationResponse,
};

pub use functions::{ROLE_ASSISTANT, ROLE_USER, document_to_message_view, session_filter_queries, validate_append};
