//! Shows the fixed-window limiter pacing a burst of submissions: three
//! documents at two per second, with per-call timing printed.

// std
use std::{sync::Arc, time::Instant};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use ismp_client::{
	api::ApiDescriptor,
	auth::EchoSigner,
	client::IsmpClient,
	document::{Document, DocumentItem},
	limit::RateQuota,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/cert/key");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"uuid\":\"demo-uuid\",\"data\":\"demo-challenge\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/cert/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-token\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/lk/documents/create");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":\"demo-document-id\"}");
		})
		.await;

	let descriptor = ApiDescriptor::from_base(Url::parse(&server.base_url())?)?;
	let client = IsmpClient::new(descriptor, RateQuota::per_second(2)?, Arc::new(EchoSigner))?;
	let document = Document {
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
	};
	let started = Instant::now();

	// The third submission exceeds the two-per-second budget and is parked
	// until the window rolls over.
	for index in 1..=3 {
		client.create_document(&document, "demo-signature").await?;

		println!("Submission {index} finished at {:.3}s.", started.elapsed().as_secs_f64());
	}

	Ok(())
}
