//! Typed lookup and composition behavior of the client façade.

mod common;

use std::sync::Arc;

use common::{RecordingLogger, offline_builder};
use wx::modules::{AccountModule, SessionModule, StoreModule};
use wx::services::{ActionFactory, FakeHttpService, HttpService};
use wx::{Client, Error, LoginModule, Logger, Module, Registration};

struct RosterModule;

impl Module for RosterModule {}

#[test]
fn modules_and_services_are_singletons() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let client = offline_builder(&http, &logger).build().unwrap();

	let store_a = client.get_module::<StoreModule>().unwrap();
	let store_b = client.get_module::<StoreModule>().unwrap();
	assert!(Arc::ptr_eq(&store_a, &store_b));

	let session_a = client.get_module::<SessionModule>().unwrap();
	let session_b = client.clone().get_module::<SessionModule>().unwrap();
	assert!(Arc::ptr_eq(&session_a, &session_b));

	let login_a = client.get_module::<dyn LoginModule>().unwrap();
	let login_b = client.get_module::<dyn LoginModule>().unwrap();
	assert!(Arc::ptr_eq(&login_a, &login_b));

	let account_a = client.get_module::<AccountModule>().unwrap();
	let account_b = client.get_module::<AccountModule>().unwrap();
	assert!(Arc::ptr_eq(&account_a, &account_b));

	let actions_a = client.get_service::<dyn ActionFactory>().unwrap();
	let actions_b = client.get_service::<dyn ActionFactory>().unwrap();
	assert!(Arc::ptr_eq(&actions_a, &actions_b));
}

#[test]
fn injected_services_are_the_registered_instances() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let client = offline_builder(&http, &logger).build().unwrap();

	let resolved_http = client.get_service::<dyn HttpService>().unwrap();
	let expected_http: Arc<dyn HttpService> = http.clone();
	assert!(std::ptr::addr_eq(Arc::as_ptr(&resolved_http), Arc::as_ptr(&expected_http)));

	let resolved_logger = client.get_service::<dyn Logger>().unwrap();
	let expected_logger: Arc<dyn Logger> = logger.clone();
	assert!(std::ptr::addr_eq(Arc::as_ptr(&resolved_logger), Arc::as_ptr(&expected_logger)));
}

#[test]
fn unregistered_types_fail_with_unregistered_type() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let client = offline_builder(&http, &logger).build().unwrap();

	match client.get_module::<RosterModule>() {
		Err(Error::UnregisteredType(name)) => assert!(name.ends_with("RosterModule")),
		other => panic!("expected UnregisteredType, got {:?}", other.map(|_| ())),
	}

	// Services were registered under their trait objects, not their concrete types.
	let err = client.get_service::<FakeHttpService>().err();
	assert!(err.is_some_and(|err| err.is_unregistered()));
}

#[test]
fn extra_registrations_resolve_after_builtins() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let client = offline_builder(&http, &logger)
		.register_with(|registry| {
			// Built-ins are already present when extensions are composed.
			registry.resolve::<StoreModule>()?;
			Ok(Registration::new(Arc::new(RosterModule)).module())
		})
		.build()
		.unwrap();

	assert!(client.get_module::<RosterModule>().is_ok());
}

#[test]
fn missing_dependency_aborts_construction() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let result = offline_builder(&http, &logger)
		.register_with(|registry| {
			registry.resolve::<RosterModule>()?;
			Ok(Registration::new(Arc::new(42u32)))
		})
		.build();

	assert!(matches!(result, Err(Error::UnregisteredType(name)) if name.ends_with("RosterModule")));
}

#[test]
fn duplicate_registration_aborts_construction() {
	let http = Arc::new(FakeHttpService::new());
	let logger = Arc::new(RecordingLogger::default());
	let result = offline_builder(&http, &logger)
		.register(Registration::new(Arc::new(StoreModule::new())).module())
		.build();

	assert!(matches!(result, Err(Error::DuplicateRegistration(name)) if name.ends_with("StoreModule")));
}

#[test]
fn default_client_composes_without_network() {
	let client = Client::new(None).unwrap();
	assert!(!client.has_listener());
	assert!(client.get_service::<dyn HttpService>().is_ok());
	assert!(client.get_service::<dyn Logger>().is_ok());
	assert_eq!(client.config().login_url(), "https://wx.qq.com/cgi-bin/mmwebwx-bin/login");
}
