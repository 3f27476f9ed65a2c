pub mod appwrite_api;
pub mod lead_service;
pub mod notify_service;
