//! Tests for lap-time and off-track logs

#[cfg(test)]
mod tests {
    use dustlog_core::lap_time::LapTimes;
    use dustlog_core::off_track::{OffTrackSample, OffTrackSummary};
    use dustlog_core::timing::{final_game_time, parse_game_time};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_game_time_conversion() {
        assert_eq!(parse_game_time("01:30.50"), Some(90.5));
        assert_eq!(parse_game_time("00:00.00"), Some(0.0));
        assert_eq!(parse_game_time("1:30"), Some(90.0));
        assert_eq!(parse_game_time("garbage"), None);
    }

    #[test]
    fn test_lap_times_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laptime_4.log");
        fs::write(
            &path,
            "[SYS: 2024-11-02 14:03:11][GAME: 01:02.30] Bot finish time: 62.30\n\
             [SYS: 2024-11-02 14:03:20][GAME: 01:10.05] Player finish time: 70.05\n",
        )
        .unwrap();

        let times = LapTimes::from_file(&path).unwrap();
        assert!(times.is_complete());
        assert!((times.bot.unwrap() - 62.3).abs() < 1e-9);
        assert!((times.player.unwrap() - 70.05).abs() < 1e-9);
        assert!((times.margin().unwrap() - 7.75).abs() < 1e-9);
    }

    #[test]
    fn test_lap_time_missing_marker_is_none() {
        let times = LapTimes::extract(["[GAME: 00:50.00] Bot finish time: 50.00"]);
        assert_eq!(times.bot, Some(50.0));
        assert_eq!(times.player, None);
        assert_eq!(times.margin(), None);
    }

    #[test]
    fn test_lap_time_first_occurrence_wins() {
        let times = LapTimes::extract([
            "[GAME: 00:50.00] Player finish time: 50.00",
            "[GAME: 00:55.00] Player finish time: 55.00",
        ]);
        assert_eq!(times.player, Some(50.0));
    }

    #[test]
    fn test_off_track_duration() {
        let lines = [
            "[GAME: 00:00.00] isOffTrack check: left=0, right=0",
            "[GAME: 00:02.00] isOffTrack check: left=1, right=0",
            "[GAME: 00:05.00] isOffTrack check: left=0, right=0",
            "[GAME: 00:06.00] isOffTrack check: left=0, right=1",
            "[GAME: 00:06.50] isOffTrack check: left=1, right=1",
            "[GAME: 00:07.00] isOffTrack check: left=0, right=0",
        ];
        let summary = OffTrackSummary::extract(lines);
        assert_eq!(summary.duration, 4.0);
        assert_eq!(summary.intervals, vec![(2.0, 5.0), (6.0, 7.0)]);
        assert_eq!(summary.samples, 6);
    }

    #[test]
    fn test_off_track_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OffTrackSummary::from_file(dir.path().join("offtrack_1.log")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_off_track_sample_parse() {
        let sample =
            OffTrackSample::parse("[GAME: 00:03.25] isOffTrack check: left=0, right=1").unwrap();
        assert_eq!(sample.time, 3.25);
        assert!(!sample.left);
        assert!(sample.is_off());
        assert!(OffTrackSample::parse("[GAME: 00:03.25] on track").is_none());
    }

    #[test]
    fn test_final_game_time() {
        let lines = [
            "[GAME: 00:10.00] a",
            "no stamp",
            "[GAME: 01:05.20] b",
            "[GAME: 00:59.99] c",
        ];
        assert!((final_game_time(lines).unwrap() - 65.2).abs() < 1e-9);
        assert_eq!(final_game_time(["nothing"]), None);
    }
}
