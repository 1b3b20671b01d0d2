//! Payment events routed through a TOML listener table
//!
//! Run with: RUST_LOG=info cargo run -p armature-dispatch --example payment

use armature_dispatch::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct PaymentEvent {
    order_id: String,
    amount: u64,
}

#[derive(Debug)]
struct RefundEvent {
    order_id: String,
}

#[derive(Default)]
struct PaymentListener;

impl Listener<PaymentEvent> for PaymentListener {
    fn handle(&self, event: &PaymentEvent) -> Result<(), ListenerError> {
        println!("Charging {} for order {}", event.amount, event.order_id);
        Ok(())
    }
}

#[derive(Default)]
struct ReceiptListener;

impl Listener<PaymentEvent> for ReceiptListener {
    fn handle(&self, event: &PaymentEvent) -> Result<(), ListenerError> {
        println!("Sending receipt for order {}", event.order_id);
        Ok(())
    }
}

const LISTENERS: &str = r#"
log_events = true

[listen]
"app.payment" = ["payment_listener", "receipt_listener"]
"app.refund" = ["refund_mailer"]
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let container = ListenerContainer::new();
    container.register_default::<PaymentEvent, PaymentListener>("payment_listener");
    container.register_default::<PaymentEvent, ReceiptListener>("receipt_listener");
    // Not a listener: firing it is a configuration error.
    container.register_component("refund_mailer", || Ok(String::from("smtp://localhost")));

    let catalog = EventCatalog::new()
        .register_as::<PaymentEvent>("app.payment")
        .register_as::<RefundEvent>("app.refund");

    let config = DispatcherConfig::from_toml_str(LISTENERS)?;
    let dispatcher = EventDispatcherBuilder::from_config(config, &catalog)?
        .factory(container)
        .listen(|event: &PaymentEvent| {
            tracing::info!(order_id = %event.order_id, "payment audited");
            Ok(())
        })
        .build();

    dispatcher.dispatch(&PaymentEvent {
        order_id: "A-1001".to_string(),
        amount: 10,
    })?;

    let refund = RefundEvent {
        order_id: "A-1001".to_string(),
    };
    if let Err(e) = dispatcher.dispatch(&refund) {
        eprintln!("Refund for {} not dispatched: {}", refund.order_id, e);
    }

    Ok(())
}
