use crate::model::NetCounters;
use sysinfo::Networks;

pub fn total_bytes(networks: &Networks) -> NetCounters {
    let mut counters = NetCounters::default();
    for (_name, data) in networks.iter() {
        counters.bytes_recv += data.total_received();
        counters.bytes_sent += data.total_transmitted();
    }
    counters
}

pub fn collect(networks: &mut Networks) -> NetCounters {
    networks.refresh(true);
    total_bytes(networks)
}
