//! Result entity contract for typed response collections.

use pn_core::error::PnResult;
use serde_json::Value;

/// One decoded record from a carrier response's result array.
///
/// Implementors name the wrapper keys their payloads carry on the wire and
/// provide the deserialization factory; [`ResponseCollection`] drives both
/// when mapping a raw payload.
///
/// [`ResponseCollection`]: crate::collection::ResponseCollection
pub trait ResultEntity: Sized {
    /// Top-level key identifying the response payload this entity belongs to.
    const RESPONSE_KEY: &'static str;

    /// Wrapper key for a single serialized entity.
    const ENTITY_KEY: &'static str;

    /// Decode one entity from its wrapped form `{"<ENTITY_KEY>": { ...fields... }}`.
    ///
    /// Fails with [`PnError::InvalidArgument`] when the wrapper or a required
    /// field is missing or malformed.
    ///
    /// [`PnError::InvalidArgument`]: pn_core::error::PnError::InvalidArgument
    fn from_json(raw: &Value) -> PnResult<Self>;

    /// Serialize the entity back to its bare field object.
    fn to_json(&self) -> Value;
}
