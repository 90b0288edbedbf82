//! End-to-end bridge behavior: both resolution directions through a fully
//! assembled application.

use std::sync::Arc;

use dualorm::app::{bootstrap, IntegrationModule};
use dualorm::bridge::InjectorManager;
use dualorm::config::AppConfig;
use dualorm::container::{ContainerError, Injector, PrimaryContainer};
use dualorm::domain::Product;
use dualorm::services::{Calculator, CrossProductService, ProductRepository, ProductService};

#[test]
fn forward_direction_shares_primary_singletons() {
    let app = bootstrap(&AppConfig::default()).unwrap();
    let manager = app.primary().get::<InjectorManager>().unwrap();

    let bridged = manager.injector().get::<ProductService>().unwrap();
    let native = app.product_service().unwrap();
    assert!(Arc::ptr_eq(&bridged, &native));

    let bridged_repo = manager.injector().get::<ProductRepository>().unwrap();
    let native_repo = app.primary().get::<ProductRepository>().unwrap();
    assert!(Arc::ptr_eq(&bridged_repo, &native_repo));
}

#[test]
fn reverse_direction_shares_the_secondary_instance() {
    let app = bootstrap(&AppConfig::default()).unwrap();
    let manager = app.primary().get::<InjectorManager>().unwrap();

    let via_primary = app.primary().get::<Calculator>().unwrap();
    let via_injector = manager.instance::<Calculator>().unwrap();
    assert!(Arc::ptr_eq(&via_primary, &via_injector));
}

#[test]
fn cross_container_writes_are_visible_both_ways() {
    let app = bootstrap(&AppConfig::default()).unwrap();
    let cross = app.cross_product_service().unwrap();
    let products = app.product_service().unwrap();

    // write on the secondary side, read on the primary side
    let created = cross.create_product(Product::new("kettle", "electric", 32.0, "kitchen"));
    assert_eq!(products.get(created.id).unwrap(), created);

    // write on the primary side, read on the secondary side
    let native = products.create(Product::new("mug", "ceramic", 8.0, "kitchen"));
    assert_eq!(cross.get_product(native.id).unwrap(), native);

    assert_eq!(cross.list_products().len(), 2);
}

#[test]
fn unbridged_dependency_fails_the_requesting_object() {
    // a primary container that never registers ProductService
    let primary = PrimaryContainer::new("primary");
    primary.start().unwrap();

    let injector = Injector::from_module(&IntegrationModule::new(primary)).unwrap();

    // the bridge provider fails, which fails CrossProductService construction
    let result = injector.get::<CrossProductService>();
    assert!(matches!(
        result,
        Err(ContainerError::UnresolvedDependency { .. })
    ));

    // the secondary container's own bindings are unaffected
    assert!(injector.get::<Calculator>().is_ok());
}

#[test]
fn bridge_requires_a_started_primary() {
    let primary = PrimaryContainer::new("primary");
    // never started

    let injector = Injector::from_module(&IntegrationModule::new(primary.clone())).unwrap();
    let result = injector.get::<ProductService>();
    assert!(matches!(result, Err(ContainerError::NotStarted { .. })));
    assert!(!primary.is_started());
}

#[test]
fn concurrent_bridged_resolution_yields_one_instance() {
    let app = bootstrap(&AppConfig::default()).unwrap();
    let manager = app.primary().get::<InjectorManager>().unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = manager.clone();
        handles.push(std::thread::spawn(move || {
            manager.injector().get::<ProductService>().unwrap()
        }));
    }

    let instances: Vec<Arc<ProductService>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    for instance in &instances {
        assert!(Arc::ptr_eq(instance, &instances[0]));
    }
}
