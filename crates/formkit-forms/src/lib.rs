//! Headless form enhancement for server-rendered pages
//!
//! This crate holds everything about formkit that does not need a browser:
//! - Field model and validation engine with French default messages
//! - Presentation plans (annotations) applied by a renderer
//! - Submission state machine behind `FormView`/`SubmitTransport` seams
//! - Phone country selector, city autocomplete and form state cache models
//! - Auto-fill from the logged-in user's profile
//! - Settings, errors and in-memory test doubles
//!
//! The DOM layer lives in `formkit-pages`.

pub mod annotation;
pub mod autocomplete;
pub mod autofill;
pub mod callback;
pub mod context;
pub mod error;
pub mod field;
pub mod phone;
pub mod schedule;
pub mod settings;
pub mod snapshot;
pub mod state_cache;
pub mod submission;
pub mod testing;
pub mod validators;

pub use annotation::{ERROR_CLASS, ERROR_NODE_CLASS, FieldAnnotation, SUCCESS_CLASS};
pub use autocomplete::{
	CityListResponse, FALLBACK_CITIES, Key, KeyOutcome, LocationAutocomplete, SelectionState,
};
pub use autofill::{AUTOFILL_FIELDS, CurrentUser, UserProfile, autofill_values};
pub use callback::Callback;
pub use context::{Notifier, PageContext, SilentNotifier, ToastKind};
pub use error::{FormError, FormResult, TransportError};
pub use field::{Field, InputType};
pub use phone::{COUNTRIES, Country, PhoneCountrySelector};
pub use schedule::{Debouncer, Schedule};
pub use settings::{
	AutocompleteSettings, FormkitSettings, PhoneSettings, StateCacheSettings, ValidationMessages,
	ValidatorSettings,
};
pub use snapshot::FormSnapshot;
pub use state_cache::{CachedState, FormStateCache, KeyValueStore, MemoryStore};
pub use submission::{
	FormView, SubmissionController, SubmissionOutcome, SubmissionState, SubmitRequest,
	SubmitResponse, SubmitTransport,
};
pub use validators::{FieldEvent, FieldRule, FieldValidator, RealtimeAction, ValidationResult};
