//! Table-mod handling: config writes and vacancy-threshold maintenance
//! (§4.4).

use dp_model::error::OfpError;
use dp_model::message::TableMod;
use dp_model::ports::FlowTable;
use dp_model::role::{require_not_slave, ControllerRole};
use dp_model::table::{vacancy_percent, TableProperty};

use crate::constants::ALL_TABLES;
use crate::pipeline::Pipeline;

pub fn handle<T: FlowTable>(pipeline: &mut Pipeline<T>, role: ControllerRole, msg: &TableMod) -> Result<(), OfpError> {
    require_not_slave(role)?;

    if msg.table_id == ALL_TABLES {
        for table in pipeline.tables_mut() {
            apply(table, msg)?;
        }
    } else {
        let table = pipeline.table_mut(msg.table_id).ok_or(OfpError::FlowModFailedBadTableId)?;
        apply(table, msg)?;
    }

    Ok(())
}

fn apply<T: FlowTable>(table: &mut T, msg: &TableMod) -> Result<(), OfpError> {
    for property in &msg.properties {
        if let TableProperty::Vacancy(update) = property {
            if !update.thresholds_valid() {
                return Err(OfpError::TableFeaturesFailedBadArgument);
            }
            let active = table.stats().active_count;
            let max_entries = table.features().max_entries;
            let current = vacancy_percent(max_entries, active);

            if let Some(existing) = table.desc_mut().vacancy_mut() {
                existing.vacancy_down = update.vacancy_down;
                existing.vacancy_up = update.vacancy_up;
                existing.down_set = current >= update.vacancy_up;
            }
        }
    }

    let config = msg.config;
    table.desc_mut().config = config;
    Ok(())
}
