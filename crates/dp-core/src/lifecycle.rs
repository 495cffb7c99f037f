//! Features save/restore (§4.8) and the periodic timeout fan-out (§4.9).
//!
//! Both are parameterless, pipeline-wide operations with no return value;
//! their effects are entirely inside each table's collaborator-owned
//! state.

use dp_model::ports::FlowTable;

use crate::pipeline::Pipeline;

/// Copies each table's current `features.config` into `saved_features`,
/// to bracket a tentative configuration change.
pub fn save_features<T: FlowTable>(pipeline: &mut Pipeline<T>) {
    for table in pipeline.tables_mut() {
        let config = table.features().config;
        let mut saved = table.saved_features().clone();
        saved.config = config;
        table.set_saved_features(saved);
    }
}

/// The inverse of [`save_features`]: restores each table's `features.config`
/// from `saved_features`.
pub fn restore_features<T: FlowTable>(pipeline: &mut Pipeline<T>) {
    for table in pipeline.tables_mut() {
        let config = table.saved_features().config;
        let mut features = table.features().clone();
        features.config = config;
        table.set_features(features);
    }
}

/// Fans out to every table's timeout routine (hard/idle-timeout eviction).
/// The pipeline holds no timers of its own.
pub fn timeout_tick<T: FlowTable>(pipeline: &mut Pipeline<T>) {
    for table in pipeline.tables_mut() {
        table.timeout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_adapters::flow_table::InMemoryFlowTable;
    use dp_model::table::TableFeatures;

    #[test]
    fn save_then_restore_round_trips_config() {
        let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
        {
            let table = pipeline.table_mut(0).unwrap();
            let mut features = TableFeatures::default();
            features.config.vacancy_events = true;
            table.set_features(features);
        }
        save_features(&mut pipeline);

        {
            let table = pipeline.table_mut(0).unwrap();
            let mut reset = TableFeatures::default();
            reset.config.vacancy_events = false;
            table.set_features(reset);
        }
        restore_features(&mut pipeline);

        assert!(pipeline.table(0).unwrap().features().config.vacancy_events);
    }
}
