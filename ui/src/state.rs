use catalog_core::Record;
use leptos::*;

/// Widget-owned catalog state. The catalog is loaded once per page view;
/// everything shown is a derived projection of it.
#[derive(Clone, Copy)]
pub struct CatalogCtx {
    pub catalog: RwSignal<Vec<Record>>,
    pub load_error: RwSignal<Option<String>>,
    pub loaded: RwSignal<bool>,
}

pub fn provide_catalog_ctx() -> CatalogCtx {
    let ctx = CatalogCtx {
        catalog: create_rw_signal(Vec::new()),
        load_error: create_rw_signal(None),
        loaded: create_rw_signal(false),
    };
    provide_context(ctx);
    ctx
}

pub fn use_catalog_ctx() -> CatalogCtx {
    use_context::<CatalogCtx>().expect("CatalogCtx not provided")
}
