use tracing::{debug, info, warn};

use crate::domain::bin::BinRegistry;
use crate::domain::types::{BinId, NodeId, Truck, TruckState};
use crate::error::Result;
use crate::priority::queue::BinQueue;
use crate::routing::graph::RoadNetwork;
use crate::routing::shortest_path::{shortest_paths, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing urgent to collect.
    Idle,
    /// The truck drove to `bin`, which now waits for the driver to empty it.
    Arrived { bin: BinId, route: Route },
    /// The truck was full and unloaded at the depot.
    ReturnedToDepot { route: Route },
}

/// Moves a truck between urgent bins and the depot.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    pub depot: NodeId,
}

impl Dispatcher {
    pub fn new(network: &RoadNetwork, depot: NodeId) -> Result<Self> {
        network.check_node(depot)?;
        Ok(Dispatcher { depot })
    }

    /// Take the next decision for `truck`: unload if it is full, otherwise
    /// drive to the most urgent bin.
    ///
    /// An unreachable bin is put back into `queue` and reported as `NoPath`.
    /// The queue is left untouched when the top bin is not in `bins`.
    pub fn dispatch_next(
        &self,
        truck: &mut Truck,
        network: &RoadNetwork,
        queue: &mut BinQueue,
        bins: &mut BinRegistry,
    ) -> Result<DispatchOutcome> {
        if truck.state == TruckState::Full || truck.is_full() {
            let route = self.return_to_depot(truck, network)?;
            return Ok(DispatchOutcome::ReturnedToDepot { route });
        }

        let Some(top) = queue.peek() else {
            truck.state = TruckState::Idle;
            debug!("Truck {} idle, no urgent bins", truck.id);
            return Ok(DispatchOutcome::Idle);
        };
        let bin = bins.get_mut(top.bin)?;
        let entry = queue.pop_max()?;

        let route = match shortest_paths(network, truck.current_node)
            .and_then(|paths| paths.route_to(bin.node()))
        {
            Ok(route) => route,
            Err(e) => {
                warn!(
                    "Truck {} cannot reach bin {} at node {}: {}",
                    truck.id,
                    bin.id(),
                    bin.node(),
                    e
                );
                queue.insert(bin)?;
                return Err(e);
            }
        };

        truck.arrive_at_bin(route.target, route.distance);
        bin.mark_collected();

        info!(
            "Truck {} moved to bin {} at node {} (fill {}%, distance {}, path {})",
            truck.id,
            bin.id(),
            route.target,
            entry.priority,
            route.distance,
            route.display_path()
        );

        Ok(DispatchOutcome::Arrived {
            bin: entry.bin,
            route,
        })
    }

    pub fn return_to_depot(&self, truck: &mut Truck, network: &RoadNetwork) -> Result<Route> {
        let route = shortest_paths(network, truck.current_node)?.route_to(self.depot)?;
        truck.unload_at(self.depot, route.distance);

        info!(
            "Truck {} returned to depot (distance {}, path {})",
            truck.id,
            route.distance,
            route.display_path()
        );
        Ok(route)
    }

    /// Drive back to the depot at the end of a run, unless already there.
    pub fn finish(&self, truck: &mut Truck, network: &RoadNetwork) -> Result<Option<Route>> {
        if truck.current_node == self.depot {
            return Ok(None);
        }
        self.return_to_depot(truck, network).map(Some)
    }
}
