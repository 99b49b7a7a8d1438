use crate::drain::{RecordSink, RecordSource};
use rabbitmq_http_client::blocking_api::Client;
use rabbitmq_http_client::commons::QueueType;
use rabbitmq_http_client::requests::{MessageProperties, QueueParams};
use std::collections::VecDeque;
use std::error::Error;
use url::Url;

const PAGE_SIZE: u32 = 1000;

// The HTTP API addresses the default exchange by this name.
const DEFAULT_EXCHANGE: &str = "amq.default";

pub type RmqClient = Client<String, String, String>;

/// An open handle to one queue, declared (durable, classic) if absent.
/// Shared by both queue-backed medium implementations.
struct QueueHandle {
    client: RmqClient,
    vhost: String,
    queue: String,
}

impl QueueHandle {
    fn open(url: &str, vhost: &str, queue: &str) -> Result<QueueHandle, Box<dyn Error>> {
        let url = Url::parse(url)?;
        let endpoint = format!(
            "{}://{}:{}{}",
            url.scheme(),
            url.domain().expect("Domain is missing"),
            url.port().unwrap_or(443),
            url.path()
        );

        println!(
            "Connecting to endpoint '{}' and vhost '{}'",
            endpoint, vhost
        );
        let client = Client::new(
            endpoint,
            url.username().to_string(),
            url.password().expect("Password is missing").to_string(),
        );

        client.declare_queue(
            vhost,
            &QueueParams {
                name: queue,
                queue_type: QueueType::Classic,
                durable: true,
                auto_delete: false,
                exclusive: false,
                arguments: None,
            },
        )?;

        Ok(QueueHandle {
            client,
            vhost: vhost.to_string(),
            queue: queue.to_string(),
        })
    }
}

/// Drains a queue page by page until a poll comes back empty.
///
/// Messages are removed from the queue as each page is fetched, before the
/// caller has written them anywhere, so a crash mid-run drops the rest of
/// the current page. Running again against the same queue yields only what
/// was left on it.
pub struct QueueSource {
    handle: QueueHandle,
    page: VecDeque<String>,
}

impl QueueSource {
    pub fn open(url: &str, vhost: &str, queue: &str) -> Result<QueueSource, Box<dyn Error>> {
        Ok(QueueSource {
            handle: QueueHandle::open(url, vhost, queue)?,
            page: VecDeque::new(),
        })
    }
}

impl RecordSource for QueueSource {
    fn next_record(&mut self) -> Result<Option<String>, Box<dyn Error>> {
        if self.page.is_empty() {
            let messages = self.handle.client.get_messages(
                &self.handle.vhost,
                &self.handle.queue,
                PAGE_SIZE,
                "ack_requeue_false",
            )?;
            self.page
                .extend(messages.into_iter().map(|message| message.payload));
        }

        Ok(self.page.pop_front())
    }
}

/// Publishes each record as one message, routed to the queue through the
/// default exchange. One HTTP round-trip per record.
pub struct QueueSink {
    handle: QueueHandle,
}

impl QueueSink {
    pub fn open(url: &str, vhost: &str, queue: &str) -> Result<QueueSink, Box<dyn Error>> {
        Ok(QueueSink {
            handle: QueueHandle::open(url, vhost, queue)?,
        })
    }
}

impl RecordSink for QueueSink {
    fn write(&mut self, record: &str) -> Result<(), Box<dyn Error>> {
        self.handle.client.publish_message(
            &self.handle.vhost,
            DEFAULT_EXCHANGE,
            &self.handle.queue,
            record,
            MessageProperties::new(),
        )?;
        Ok(())
    }
}
