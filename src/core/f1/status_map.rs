// Short labels for the finishing statuses the API reports.
// Anything not listed (e.g. "+1 Lap") is shown as-is.

pub const FINISHED: &str = "Finished";

pub fn short_status(status: &str) -> &str {
    match status {
        "Lapped" => "Lapped",
        "Retired" => "DNF",
        "Accident" => "DNF (Accident)",
        "Collision" => "DNF (Collision)",
        "Spun off" => "DNF (Spin)",
        "Not classified" => "NC",
        "Gearbox" => "DNF (Gearbox)",
        "Engine" => "DNF (Engine)",
        "Transmission" => "DNF (Transmission)",
        "Electrical" => "DNF (Electrical)",
        "Out of fuel" => "DNF (Fuel)",
        "Oil leak" | "Oil pressure" => "DNF (Oil)",
        "Brakes" => "DNF (Brakes)",
        "Suspension" => "DNF (Suspension)",
        "Tyre" => "DNF (Tyre)",
        "Cooling" => "DNF (Cooling)",
        "Did not start" | "Withdrew" | "Injury" | "Illness" => "DNS",
        "Disqualified" => "DSQ",
        "Clutch" => "DNF (Clutch)",
        "Supercharger" => "DNF (Supercharger)",
        "Hydraulics" => "DNF (Hydraulics)",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        assert_eq!(short_status("Retired"), "DNF");
        assert_eq!(short_status("Oil pressure"), "DNF (Oil)");
        assert_eq!(short_status("Withdrew"), "DNS");
        assert_eq!(short_status("Disqualified"), "DSQ");
    }

    #[test]
    fn test_unknown_status_passes_through() {
        assert_eq!(short_status("+1 Lap"), "+1 Lap");
        assert_eq!(short_status(FINISHED), FINISHED);
    }
}
