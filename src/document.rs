//! Submission document model and envelope assembly.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::DetachedSignature, error::SerializationError};

/// Document type label attached to every introduce-goods submission.
pub const DOCUMENT_TYPE_INTRODUCE_GOODS: &str = "LP_INTRODUCE_GOODS";
/// Document format label for manually assembled JSON payloads.
pub const DOCUMENT_FORMAT_MANUAL: &str = "MANUAL";

/// Introduce-goods document submitted to the registry.
///
/// Field names serialize verbatim, matching the registry's wire schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// INN of the participant submitting the document.
	pub participant_inn: String,
	/// INN of the goods producer.
	pub producer_inn: String,
	/// INN of the goods owner.
	pub owner_inn: String,
	/// Production date, `YYYY-MM-DD`.
	pub production_date: String,
	/// Production type label.
	pub production_type: String,
	/// Items covered by the document.
	pub products: Vec<DocumentItem>,
}

/// Single item entry inside a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
	/// Certificate document kind code.
	pub certificate_document: String,
	/// Certificate issue date, `YYYY-MM-DD`.
	pub certificate_document_date: String,
	/// Certificate number.
	pub certificate_document_number: String,
	/// INN of the item owner.
	pub owner_inn: String,
	/// INN of the item producer.
	pub producer_inn: String,
	/// Production date, `YYYY-MM-DD`.
	pub production_date: String,
	/// Commodity code in the TN VED classifier.
	pub tnved_code: String,
	/// Unit identification code.
	pub uit_code: String,
	/// Aggregated unit identification code.
	pub uitu_code: String,
}

/// Submission envelope posted to the create-document endpoint.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct DocumentEnvelope {
	#[serde(rename = "type")]
	pub kind: &'static str,
	pub document_format: &'static str,
	pub product_document: String,
	pub signature: String,
}
impl DocumentEnvelope {
	/// Serializes the document, base64-encodes it, and wraps it with the type and
	/// format labels plus the detached signature.
	pub(crate) fn seal(
		document: &Document,
		signature: &DetachedSignature,
	) -> Result<Self, SerializationError> {
		let raw = serde_json::to_vec(document)
			.map_err(|e| SerializationError::Encode { what: "product document", source: e })?;

		Ok(Self {
			kind: DOCUMENT_TYPE_INTRODUCE_GOODS,
			document_format: DOCUMENT_FORMAT_MANUAL,
			product_document: STANDARD.encode(raw),
			signature: signature.expose().to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn sample_document() -> Document {
		Document {
			participant_inn: "1234567890".into(),
			producer_inn: "1234567890".into(),
			owner_inn: "0987654321".into(),
			production_date: "2025-01-20".into(),
			production_type: "OWN_PRODUCTION".into(),
			products: vec![DocumentItem {
				certificate_document: "CONFORMITY_CERTIFICATE".into(),
				certificate_document_date: "2025-01-10".into(),
				certificate_document_number: "CERT-42".into(),
				owner_inn: "0987654321".into(),
				producer_inn: "1234567890".into(),
				production_date: "2025-01-20".into(),
				tnved_code: "6403".into(),
				uit_code: "010463003407001221gJJD8".into(),
				uitu_code: String::new(),
			}],
		}
	}

	#[test]
	fn seal_wraps_the_encoded_document() {
		let document = sample_document();
		let signature = DetachedSignature::new("detached-signature");
		let envelope =
			DocumentEnvelope::seal(&document, &signature).expect("Sealing should succeed.");
		let value = serde_json::to_value(&envelope).expect("Envelope should serialize.");

		assert_eq!(value["type"], DOCUMENT_TYPE_INTRODUCE_GOODS);
		assert_eq!(value["document_format"], DOCUMENT_FORMAT_MANUAL);
		assert_eq!(value["signature"], "detached-signature");

		let encoded =
			value["product_document"].as_str().expect("Encoded document should be a string.");
		let decoded = STANDARD.decode(encoded).expect("Encoded document should be base64.");
		let round: Document =
			serde_json::from_slice(&decoded).expect("Decoded document should parse.");

		assert_eq!(round, document);
	}

	#[test]
	fn documents_serialize_with_wire_field_names() {
		let value = serde_json::to_value(sample_document()).expect("Document should serialize.");

		assert!(value.get("participant_inn").is_some());
		assert!(value.get("production_type").is_some());
		assert!(value["products"][0].get("tnved_code").is_some());
		assert!(value["products"][0].get("uitu_code").is_some());
	}
}
