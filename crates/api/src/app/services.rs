use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use bistro_auth::PrincipalId;
use bistro_core::{DomainError, DomainResult, TenantId};
use bistro_events::{ChangeEnvelope, EventBus, InMemoryEventBus};
use bistro_infra::{
    seed::{demo_data, insert_all},
    AppConfig, InMemoryTable, RealtimeTable, StoreError, Table, TableRow,
};
use bistro_inventory::{low_stock_transition, InventoryItem, Supplier};
use bistro_menu::{MenuCategory, MenuItem};
use bistro_reports::{CategorySales, DailySales, HourlyOrders, ItemSales};
use bistro_resources::InterviewResource;
use bistro_sales::{Cart, CartState};

#[cfg(feature = "postgres")]
use bistro_infra::PostgresTable;
#[cfg(feature = "postgres")]
use sqlx::PgPool;

pub const LOW_STOCK_TOPIC: &str = "inventory.low_stock";

/// Realtime message broadcasted via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub tenant_id: TenantId,
    pub topic: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("USE_PERSISTENT_STORES is set but this build lacks the `postgres` feature")]
    PostgresDisabled,

    #[error("DATABASE_URL is required for persistent stores")]
    MissingDatabaseUrl,

    #[cfg(feature = "postgres")]
    #[error("failed to connect to postgres: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("demo data rejected: {0}")]
    Seed(#[from] DomainError),
}

type ChangeBus = Arc<InMemoryEventBus<ChangeEnvelope>>;

enum Backend {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres(Arc<PgPool>),
}

impl Backend {
    fn table<R: TableRow>(&self, bus: &ChangeBus) -> Arc<dyn Table<R>> {
        match self {
            Backend::InMemory => Arc::new(RealtimeTable::new(InMemoryTable::<R>::new(), bus.clone())),
            #[cfg(feature = "postgres")]
            Backend::Postgres(pool) => {
                Arc::new(RealtimeTable::new(PostgresTable::<R>::new(pool.clone()), bus.clone()))
            }
        }
    }
}

/// Per-(tenant, principal) carts. Session-local, never persisted.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: Mutex<HashMap<(TenantId, PrincipalId), Cart>>,
}

impl CartStore {
    /// Current cart, empty when the principal has none.
    pub fn get(&self, tenant_id: TenantId, principal_id: PrincipalId) -> Cart {
        let carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
        carts.get(&(tenant_id, principal_id)).cloned().unwrap_or_default()
    }

    /// Apply `f` to a copy of the cart; the copy replaces the stored cart only
    /// when `f` succeeds. Empty carts are not kept.
    pub fn update(
        &self,
        tenant_id: TenantId,
        principal_id: PrincipalId,
        f: impl FnOnce(&mut Cart) -> DomainResult<()>,
    ) -> DomainResult<Cart> {
        let key = (tenant_id, principal_id);
        let mut carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cart = carts.get(&key).cloned().unwrap_or_default();
        f(&mut cart)?;
        if cart.state() == CartState::Empty {
            carts.remove(&key);
        } else {
            carts.insert(key, cart.clone());
        }
        Ok(cart)
    }
}

/// Shared application state handed to every handler.
pub struct AppServices {
    pub categories: Arc<dyn Table<MenuCategory>>,
    pub menu_items: Arc<dyn Table<MenuItem>>,
    pub inventory: Arc<dyn Table<InventoryItem>>,
    pub suppliers: Arc<dyn Table<Supplier>>,
    pub resources: Arc<dyn Table<InterviewResource>>,
    pub daily_sales: Arc<dyn Table<DailySales>>,
    pub item_sales: Arc<dyn Table<ItemSales>>,
    pub hourly_orders: Arc<dyn Table<HourlyOrders>>,
    pub category_sales: Arc<dyn Table<CategorySales>>,
    pub carts: CartStore,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Load the demo restaurant into `tenant_id`.
    pub async fn seed_demo(&self, tenant_id: TenantId, as_of: NaiveDate) -> Result<(), BuildError> {
        let data = demo_data(as_of)?;
        insert_all(self.suppliers.as_ref(), tenant_id, data.suppliers).await?;
        insert_all(self.inventory.as_ref(), tenant_id, data.inventory).await?;
        insert_all(self.categories.as_ref(), tenant_id, data.categories).await?;
        insert_all(self.menu_items.as_ref(), tenant_id, data.menu_items).await?;
        insert_all(self.daily_sales.as_ref(), tenant_id, data.daily_sales).await?;
        insert_all(self.item_sales.as_ref(), tenant_id, data.item_sales).await?;
        insert_all(self.hourly_orders.as_ref(), tenant_id, data.hourly_orders).await?;
        insert_all(self.category_sales.as_ref(), tenant_id, data.category_sales).await?;
        Ok(())
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, BuildError> {
    let backend = backend(config).await?;

    let bus: ChangeBus = Arc::new(InMemoryEventBus::new());
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(config.realtime_buffer);
    spawn_realtime_bridge(&bus, realtime_tx.clone());

    let services = AppServices {
        categories: backend.table(&bus),
        menu_items: backend.table(&bus),
        inventory: backend.table(&bus),
        suppliers: backend.table(&bus),
        resources: backend.table(&bus),
        daily_sales: backend.table(&bus),
        item_sales: backend.table(&bus),
        hourly_orders: backend.table(&bus),
        category_sales: backend.table(&bus),
        carts: CartStore::default(),
        realtime_tx,
    };

    if config.seed_demo_data {
        let tenant_id = config.demo_tenant_id.unwrap_or_default();
        let as_of = chrono::Utc::now().date_naive();
        services.seed_demo(tenant_id, as_of).await?;
        tracing::info!(%tenant_id, %as_of, "seeded demo restaurant");
    }

    Ok(services)
}

async fn backend(config: &AppConfig) -> Result<Backend, BuildError> {
    if !config.use_persistent_stores {
        tracing::info!("using in-memory tables");
        return Ok(Backend::InMemory);
    }

    #[cfg(feature = "postgres")]
    {
        let url = config.database_url.as_deref().ok_or(BuildError::MissingDatabaseUrl)?;
        let pool = PgPool::connect(url).await?;
        bistro_infra::table::postgres::ensure_schema(&pool).await?;
        tracing::info!("using postgres tables");
        return Ok(Backend::Postgres(Arc::new(pool)));
    }

    #[cfg(not(feature = "postgres"))]
    {
        return Err(BuildError::PostgresDisabled);
    }
}

/// Background subscriber: change bus -> realtime broadcast.
///
/// Runs until the bus is dropped.
fn spawn_realtime_bridge(bus: &ChangeBus, realtime_tx: broadcast::Sender<RealtimeMessage>) {
    let sub = bus.subscribe();
    tokio::task::spawn_blocking(move || {
        while let Ok(change) = sub.recv() {
            for message in realtime_messages(&change) {
                // Lossy: no SSE client connected is fine.
                let _ = realtime_tx.send(message);
            }
        }
        tracing::debug!("realtime bridge stopped");
    });
}

/// Messages a single row change fans out to.
///
/// Every change yields a `<table>.<kind>` message. Inventory changes that
/// cross the low-stock threshold also yield an [`LOW_STOCK_TOPIC`] alert.
pub fn realtime_messages(change: &ChangeEnvelope) -> Vec<RealtimeMessage> {
    let mut out = vec![RealtimeMessage {
        tenant_id: change.tenant_id(),
        topic: change.topic(),
        payload: serde_json::json!({
            "table": change.table(),
            "kind": change.kind(),
            "id": change.record_id(),
            "row": change.row(),
        }),
    }];

    if change.table() == InventoryItem::TABLE {
        match low_stock_alert(change) {
            Ok(Some(alert)) => out.push(alert),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "undecodable inventory change"),
        }
    }

    out
}

fn low_stock_alert(change: &ChangeEnvelope) -> Result<Option<RealtimeMessage>, serde_json::Error> {
    let current: InventoryItem = change.decode_row()?;
    let previous: Option<InventoryItem> = change.decode_previous().transpose()?;

    Ok(low_stock_transition(previous.as_ref(), &current).map(|transition| RealtimeMessage {
        tenant_id: change.tenant_id(),
        topic: LOW_STOCK_TOPIC.to_string(),
        payload: serde_json::json!({
            "transition": transition,
            "item_id": change.record_id(),
            "name": current.name(),
            "current_stock": current.current_stock(),
            "min_stock": current.min_stock(),
            "unit": current.unit(),
        }),
    }))
}

pub fn tenant_sse_stream(
    services: Arc<AppServices>,
    tenant_id: TenantId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.tenant_id == tenant_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, %tenant_id, "sse client lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
