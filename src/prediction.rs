extern crate heapless;

/// Most trains we keep (and draw) at once: one per direction.
pub const MAX_TRAINS: usize = 2;

pub const DESTINATION_MAX_CHARS: usize = 4;
pub const MINUTES_MAX_CHARS: usize = 3;
pub const LINE_MAX_CHARS: usize = 2;

// Capacities are in bytes, sized so the char limits above always fit even
// when every char is a 4-byte code point.
pub type DestinationText = heapless::String<16>;
pub type MinutesText = heapless::String<12>;
pub type LineText = heapless::String<8>;

pub type Predictions = heapless::Vec<Prediction, MAX_TRAINS>;

/// One upstream arrival record, straight out of the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArrival {
    pub destination: String,
    /// Whole minutes as text, or "ARR" / "BRD".
    pub minutes: String,
    pub line: String,
    /// Direction at this station ("1" or "2" on WMATA).
    pub group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prediction {
    pub destination: DestinationText,
    pub minutes: MinutesText,
    pub line: LineText,
}

impl Prediction {
    pub fn new(destination: &str, minutes: &str, line: &str) -> Prediction {
        return Prediction {
            destination: truncated(destination, DESTINATION_MAX_CHARS),
            minutes: truncated(minutes, MINUTES_MAX_CHARS),
            line: truncated(line, LINE_MAX_CHARS),
        };
    }

    pub fn from_raw(arrival: &RawArrival) -> Prediction {
        return Prediction::new(&arrival.destination, &arrival.minutes, &arrival.line);
    }

    /// Stand-in returned for lookups past the end of the list.
    pub fn absent() -> Prediction {
        return Prediction::default();
    }

    pub fn is_absent(&self) -> bool {
        return self.destination.is_empty() && self.minutes.is_empty();
    }

    /// "<destination> - <minutes>", as drawn on the matrix.
    pub fn label(&self) -> String {
        return format!("{} - {}", self.destination, self.minutes);
    }
}

fn truncated<const N: usize>(text: &str, max_chars: usize) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars().take(max_chars) {
        if out.push(c).is_err() {
            break;
        }
    }
    return out;
}

/// Picks the soonest train for each direction.
///
/// `arrivals` must be in upstream order (soonest first). The first usable
/// record of each non-empty group wins; groups keep the order in which they
/// were first seen. Records without a destination or minutes are dropped
/// without claiming their group. Records with no group at all take a slot
/// each. Scanning stops once every slot is filled.
pub fn select_predictions(arrivals: &[RawArrival]) -> Predictions {
    let mut selected = Predictions::new();
    let mut seen_groups: heapless::Vec<&str, MAX_TRAINS> = heapless::Vec::new();

    for arrival in arrivals {
        if selected.is_full() {
            break;
        }

        if arrival.destination.is_empty() || arrival.minutes.is_empty() {
            continue;
        }

        if !arrival.group.is_empty() {
            if seen_groups.contains(&arrival.group.as_str()) {
                continue;
            }
            // seen_groups never outgrows selected, which still has room.
            let _ = seen_groups.push(arrival.group.as_str());
        }

        let _ = selected.push(Prediction::from_raw(arrival));
    }

    return selected;
}

#[cfg(test)]
mod tests {
    use super::{select_predictions, Prediction, RawArrival};

    fn arrivals(rows: &[(&str, &str, &str, &str)]) -> Vec<RawArrival> {
        return rows.iter().map(|(destination, minutes, line, group)| RawArrival {
            destination: destination.to_string(),
            minutes: minutes.to_string(),
            line: line.to_string(),
            group: group.to_string(),
        }).collect();
    }

    #[test]
    fn one_train_per_group() {
        let raw = arrivals(&[
            ("Glenmont", "1", "RD", "1"),
            ("Shady Grove", "1", "RD", "2"),
            ("Glenmont", "6", "RD", "1"),
            ("Shady Grove", "8", "RD", "2"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(2, selected.len());
        assert_eq!("Glen", selected[0].destination.as_str());
        assert_eq!("1", selected[0].minutes.as_str());
        assert_eq!("Shad", selected[1].destination.as_str());
        assert_eq!("1", selected[1].minutes.as_str());
    }

    #[test]
    fn duplicate_group_keeps_first() {
        let raw = arrivals(&[
            ("Glenmont", "1", "RD", "1"),
            ("Glenmont", "6", "RD", "1"),
            ("Glenmont", "11", "RD", "1"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(1, selected.len());
        assert_eq!("Glen", selected[0].destination.as_str());
        assert_eq!("1", selected[0].minutes.as_str());
    }

    #[test]
    fn keeps_first_seen_group_order() {
        let raw = arrivals(&[
            ("Shady Grove", "3", "RD", "2"),
            ("Glenmont", "5", "RD", "1"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(2, selected.len());
        assert_eq!("Shad", selected[0].destination.as_str());
        assert_eq!("Glen", selected[1].destination.as_str());
    }

    #[test]
    fn never_more_than_two() {
        let raw = arrivals(&[
            ("A", "1", "RD", "1"),
            ("B", "2", "BL", "2"),
            ("C", "3", "OR", "3"),
            ("D", "4", "SV", "1"),
            ("E", "5", "GR", "2"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(2, selected.len());
        assert_eq!("A", selected[0].destination.as_str());
        assert_eq!("B", selected[1].destination.as_str());
    }

    #[test]
    fn third_group_ignored_once_full() {
        let raw = arrivals(&[
            ("A", "1", "RD", "1"),
            ("A", "2", "RD", "1"),
            ("C", "3", "OR", "3"),
            ("B", "4", "BL", "2"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(2, selected.len());
        assert_eq!("A", selected[0].destination.as_str());
        assert_eq!("C", selected[1].destination.as_str());
    }

    #[test]
    fn skips_incomplete_records_without_claiming_group() {
        let raw = arrivals(&[
            ("", "1", "RD", "1"),
            ("Glenmont", "", "RD", "1"),
            ("Glenmont", "4", "RD", "1"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(1, selected.len());
        assert_eq!("4", selected[0].minutes.as_str());
    }

    #[test]
    fn ungrouped_records_take_their_own_slot() {
        let raw = arrivals(&[
            ("Glenmont", "2", "RD", ""),
            ("Glenmont", "7", "RD", ""),
            ("Shady Grove", "3", "RD", "2"),
        ]);

        let selected = select_predictions(&raw);

        assert_eq!(2, selected.len());
        assert_eq!("2", selected[0].minutes.as_str());
        assert_eq!("7", selected[1].minutes.as_str());
    }

    #[test]
    fn empty_input() {
        assert!(select_predictions(&[]).is_empty());
    }

    #[test]
    fn truncates_fields() {
        let p = Prediction::new("Shady Grove", "BRDX", "RED");
        assert_eq!("Shad", p.destination.as_str());
        assert_eq!("BRD", p.minutes.as_str());
        assert_eq!("RE", p.line.as_str());

        let p = Prediction::new("NoMa", "ARR", "SV");
        assert_eq!("NoMa", p.destination.as_str());
        assert_eq!("ARR", p.minutes.as_str());
        assert_eq!("SV", p.line.as_str());
        assert_eq!("NoMa - ARR", p.label());
    }

    #[test]
    fn truncates_on_char_boundaries() {
        let p = Prediction::new("Ñuñoa Sur", "12", "RD");
        assert_eq!("Ñuño", p.destination.as_str());
    }

    #[test]
    fn absent_prediction() {
        assert!(Prediction::absent().is_absent());
        assert!(!Prediction::new("Glenmont", "1", "RD").is_absent());
    }
}
