// ChatKing services
// Services provide the search pipeline: address resolution, the backend client,
// result dispatch, debounced suggestions, and settings.

pub mod address_resolver;
pub mod search_backend;
pub mod search_dispatcher;
pub mod settings_engine;
pub mod suggestion_debouncer;
