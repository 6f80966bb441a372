use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::model::chain::{ChainSnapshot, StrikeRecord};

use super::EngineError;

/// Strikes within `radius` ladder positions of the ATM strike.
///
/// The window is index-based, so it shrinks at either end of the strike
/// ladder instead of reaching further out on the other side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmWindow<'a> {
    snapshot: &'a ChainSnapshot,
    atm_index: usize,
    start: usize,
    end: usize,
}

/// Locate the ATM strike and carve out the window around it.
///
/// ATM minimizes `|strike - underlying|`; on an exact tie the lower strike
/// wins.
pub fn select(snapshot: &ChainSnapshot, radius: usize) -> Result<AtmWindow<'_>, EngineError> {
    let strikes = snapshot.strikes();
    if strikes.is_empty() {
        return Err(EngineError::EmptyChain {
            symbol: snapshot.symbol().to_string(),
        });
    }

    let price = snapshot.underlying_price();
    let mut atm_index = 0;
    let mut best = f64::INFINITY;
    for (i, record) in strikes.iter().enumerate() {
        let distance = (record.strike - price).abs();
        // Strict comparison: ascending order lets the lower strike keep a tie.
        if distance < best {
            best = distance;
            atm_index = i;
        }
    }

    let start = atm_index.saturating_sub(radius);
    let end = atm_index
        .saturating_add(radius)
        .saturating_add(1)
        .min(strikes.len());

    Ok(AtmWindow {
        snapshot,
        atm_index,
        start,
        end,
    })
}

impl<'a> AtmWindow<'a> {
    pub fn snapshot(&self) -> &'a ChainSnapshot {
        self.snapshot
    }

    pub fn atm_strike(&self) -> f64 {
        self.atm_record().strike
    }

    pub fn atm_record(&self) -> &'a StrikeRecord {
        &self.snapshot.strikes()[self.atm_index]
    }

    /// Every ladder strike above ATM, nearest first.
    pub fn strikes_above(&self) -> &'a [StrikeRecord] {
        &self.snapshot.strikes()[self.atm_index + 1..]
    }

    /// Every ladder strike below ATM, in ascending order.
    pub fn strikes_below(&self) -> &'a [StrikeRecord] {
        &self.snapshot.strikes()[..self.atm_index]
    }

    /// Position of the ATM strike inside the window.
    pub fn atm_position(&self) -> usize {
        self.atm_index - self.start
    }

    pub fn window_records(&self) -> &'a [StrikeRecord] {
        &self.snapshot.strikes()[self.start..self.end]
    }

    pub fn window_strikes(&self) -> Vec<f64> {
        self.window_records().iter().map(|r| r.strike).collect()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ladder distance between a window position and the ATM position.
    pub fn distance_from_atm(&self, position: usize) -> usize {
        position.abs_diff(self.atm_position())
    }
}

impl Serialize for AtmWindow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AtmWindow", 3)?;
        s.serialize_field("atmStrike", &self.atm_strike())?;
        s.serialize_field("windowStrikes", &self.window_strikes())?;
        s.serialize_field("windowRecords", self.window_records())?;
        s.end()
    }
}
