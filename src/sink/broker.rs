//! Publish sink (§6 "Publish sink"): synchronous emit to a Kafka topic,
//! keyed by `package_key`. No retries — delivery failures propagate.

use crate::core::error::{ConvertError, ConvertResult};
use crate::core::wire::PackageGraph;
use crate::sink::Sink;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{BaseProducer, BaseRecord, Producer};
use std::time::Duration;

pub struct BrokerSink {
  producer: BaseProducer,
  topic: String,
}

impl BrokerSink {
  pub fn new(broker_address: &str, topic: String) -> ConvertResult<Self> {
    let producer: BaseProducer = ClientConfig::new()
      .set("bootstrap.servers", broker_address)
      .create()
      .map_err(|err| ConvertError::Emit {
        package_key: topic.clone(),
        message: format!("failed to create kafka producer: {err}"),
      })?;
    Ok(Self { producer, topic })
  }
}

impl Sink for BrokerSink {
  fn emit(&self, package_key: &str, graph: &PackageGraph) -> ConvertResult<()> {
    let payload = serde_json::to_vec(graph).map_err(|err| ConvertError::Emit {
      package_key: package_key.to_string(),
      message: err.to_string(),
    })?;

    self
      .producer
      .send(BaseRecord::to(&self.topic).key(package_key).payload(&payload))
      .map_err(|(err, _)| ConvertError::Emit { package_key: package_key.to_string(), message: err.to_string() })?;

    // Block until the broker has acknowledged the record — the spec
    // calls for a synchronous emit, and `send` alone only enqueues.
    self
      .producer
      .flush(Duration::from_secs(30))
      .map_err(|err| ConvertError::Emit { package_key: package_key.to_string(), message: err.to_string() })
  }
}
