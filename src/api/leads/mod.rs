pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{__path_capture_lead, __path_lead_health, capture_lead, init_routes, lead_health};

pub use structures::{LeadCapturedResponse, LeadHealthResponse, LeadSubmission};

pub use functions::generate_lead_id;
