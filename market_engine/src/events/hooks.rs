use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, OrderConfirmationEvent, SupplierNoticeEvent};

/// The producer ends of every configured hook. Cloned into each API instance that publishes events.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_confirmation_producer: Vec<EventProducer<OrderConfirmationEvent>>,
    pub supplier_notice_producer: Vec<EventProducer<SupplierNoticeEvent>>,
}

pub struct EventHandlers {
    pub on_order_confirmation: Option<EventHandler<OrderConfirmationEvent>>,
    pub on_supplier_notice: Option<EventHandler<SupplierNoticeEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_confirmation = hooks.on_order_confirmation.map(|f| EventHandler::new(buffer_size, f));
        let on_supplier_notice = hooks.on_supplier_notice.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_confirmation, on_supplier_notice }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_confirmation {
            result.order_confirmation_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_supplier_notice {
            result.supplier_notice_producer.push(handler.subscribe());
        }
        result
    }

    /// Moves each configured handler onto its own task. Handlers shut down when the last producer is dropped.
    pub fn start_handlers(self) {
        if let Some(handler) = self.on_order_confirmation {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_supplier_notice {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_confirmation: Option<Handler<OrderConfirmationEvent>>,
    pub on_supplier_notice: Option<Handler<SupplierNoticeEvent>>,
}

impl EventHooks {
    pub fn on_order_confirmation<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderConfirmationEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_confirmation = Some(Arc::new(f));
        self
    }

    pub fn on_supplier_notice<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SupplierNoticeEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_supplier_notice = Some(Arc::new(f));
        self
    }
}
