//! Route demo.
//!
//! Builds a small car topology (tuner, head unit, amplifier) and prints the
//! routes from the tuner to the cabin speakers.
//!
//! Run with: cargo run --example route_demo
//! Set `RUST_LOG=audio_router=trace` to watch the graph being built.

use std::sync::Arc;

use audio_router::{
    Connection, ConnectionFormat, ConnectionId, Converter, ConverterId, DomainId, Gateway,
    GatewayId, InMemoryTopology, PreferFormats, Router, Sink, SinkId, Source, SourceId,
};
use tracing_subscriber::EnvFilter;

const TUNER: DomainId = DomainId::new(1);
const HEAD_UNIT: DomainId = DomainId::new(2);
const AMPLIFIER: DomainId = DomainId::new(3);

fn car() -> InMemoryTopology {
    use ConnectionFormat as F;

    let topology = InMemoryTopology::new();

    topology.add_source(Source::new(SourceId::new(1), TUNER, [F::ANALOG]).named("fm"));
    topology.add_sink(Sink::new(SinkId::new(1), TUNER, [F::ANALOG]).named("tuner-out"));

    topology.add_source(Source::new(SourceId::new(2), HEAD_UNIT, [F::ANALOG]).named("tuner-in"));
    topology.add_sink(Sink::new(SinkId::new(2), HEAD_UNIT, [F::ANALOG]).named("adc-in"));
    topology.add_source(
        Source::new(SourceId::new(3), HEAD_UNIT, [F::MONO, F::STEREO]).named("adc-out"),
    );
    topology.add_sink(Sink::new(SinkId::new(3), HEAD_UNIT, [F::MONO, F::STEREO]).named("amp-link"));

    topology.add_source(Source::new(SourceId::new(4), AMPLIFIER, [F::MONO, F::STEREO]).named("amp-in"));
    topology.add_sink(Sink::new(SinkId::new(4), AMPLIFIER, [F::MONO, F::STEREO]).named("speakers"));

    topology.add_gateway(Gateway {
        id: GatewayId::new(1),
        name: "tuner-line".into(),
        sink_id: SinkId::new(1),
        source_id: SourceId::new(2),
        sink_domain_id: TUNER,
        source_domain_id: HEAD_UNIT,
        control_domain_id: HEAD_UNIT,
        source_formats: vec![F::ANALOG],
        sink_formats: vec![F::ANALOG],
        conversion_matrix: vec![true],
    });
    topology.add_converter(Converter {
        id: ConverterId::new(1),
        name: "adc".into(),
        sink_id: SinkId::new(2),
        source_id: SourceId::new(3),
        domain_id: HEAD_UNIT,
        source_formats: vec![F::MONO, F::STEREO],
        sink_formats: vec![F::ANALOG],
        conversion_matrix: vec![true, true],
    });
    topology.add_gateway(Gateway {
        id: GatewayId::new(2),
        name: "amp-bus".into(),
        sink_id: SinkId::new(3),
        source_id: SourceId::new(4),
        sink_domain_id: HEAD_UNIT,
        source_domain_id: AMPLIFIER,
        control_domain_id: AMPLIFIER,
        source_formats: vec![F::MONO, F::STEREO],
        sink_formats: vec![F::MONO, F::STEREO],
        // straight through, no up- or downmix
        conversion_matrix: vec![true, false, false, true],
    });

    topology
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let topology = Arc::new(car());
    let mut router = Router::builder(topology.clone())
        .format_choice(PreferFormats::new([ConnectionFormat::STEREO]))
        .on_event(|e| tracing::info!(?e, "router event"))
        .build()?;

    let (fm, speakers) = (SourceId::new(1), SinkId::new(4));

    println!("Routes from fm to speakers:");
    for route in router.get_route(true, fm, speakers)? {
        println!("  {route}");
    }

    // occupy the amplifier bus, then ask again for free routes only
    topology.add_connection(Connection {
        id: ConnectionId::new(1),
        source_id: SourceId::new(4),
        sink_id: SinkId::new(4),
        connection_format: ConnectionFormat::STEREO,
    });
    let free = router.get_route_from_loaded_nodes(true, fm, speakers)?;
    println!("Free routes while the amplifier bus is busy: {}", free.len());

    Ok(())
}
