//! Tests for study loading and reports over an on-disk log layout

#[cfg(test)]
mod tests {
    use dustlog_core::export::{self, ExportFormat};
    use dustlog_core::study::{
        ControlCondition, LagCondition, LogFile, LogLayout, Source, Study, StudyConfig,
    };
    use dustlog_core::schema::LogKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn stamp(secs: u32) -> String {
        format!("[SYS: 2024-11-02 15:00:00][GAME: {:02}:{:02}.00]", secs / 60, secs % 60)
    }

    fn player_log(end: u32, control: f64) -> String {
        let mut out = String::new();
        for t in [1, end] {
            let s = stamp(t);
            out.push_str(&format!("{} car Location i= 1\n", s));
            out.push_str(&format!("{} car Location j= 2\n", s));
            out.push_str(&format!("{} Continuous angles: target=5, current=4\n", s));
            out.push_str(&format!(
                "{} Track assistance: angle=5, cur=4, diff=1, control={}\n",
                s, control
            ));
        }
        out.push_str(&format!("{} race over\n", stamp(end + 2)));
        out
    }

    fn bot_log(end: u32) -> String {
        let mut out = String::new();
        for t in [1, end] {
            let s = stamp(t);
            out.push_str(&format!("{} targetNode X: 3\n", s));
            out.push_str(&format!("{} targetNode Y: 4\n", s));
            out.push_str(&format!("{} car Location i: 0\n", s));
            out.push_str(&format!("{} car Location j: 0\n", s));
            out.push_str(&format!("{} Continuous angles: target=5, current=4\n", s));
            out.push_str(&format!(
                "{} steerControl: angle=5, cur=4, diff=1, control=-0.5\n",
                s
            ));
        }
        out
    }

    fn config(base: &Path) -> StudyConfig {
        StudyConfig {
            players: vec!["F".to_string()],
            lag_conditions: vec![LagCondition {
                name: "0 Lag".to_string(),
                delay_ms: 0,
            }],
            conditions: vec![ControlCondition {
                label: "1.0 Control Assistance".to_string(),
                assistance: 1.0,
                first_run: 1,
                run_count: 3,
            }],
            layout: LogLayout::PerPlayerLag,
            ..StudyConfig::default()
        }
        .with_base_dir(base)
        .with_output_dir(base.join("analysis"))
    }

    fn write_run(study: &Study, run: u32, player_end: u32, bot_end: u32) {
        let locator = study.locator();
        let write = |file: LogFile, content: String| {
            let path = locator.path("F", "0 Lag", file, run);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write(LogFile::Records(LogKind::Player), player_log(player_end, 0.25));
        write(LogFile::Records(LogKind::Bot), bot_log(bot_end));
        write(
            LogFile::LapTime,
            format!("{} Bot finish time: {}\n", stamp(bot_end), bot_end),
        );
        write(
            LogFile::OffTrack,
            format!(
                "{} isOffTrack check: left=1, right=0\n{} isOffTrack check: left=0, right=0\n",
                stamp(10),
                stamp(12)
            ),
        );
    }

    #[test]
    fn test_load_run() {
        let dir = tempfile::tempdir().unwrap();
        let study = Study::new(config(dir.path()));
        write_run(&study, 1, 60, 50);

        let data = study.load_run("F", "0 Lag", 1);
        assert_eq!(data.player.as_ref().map(|s| s.len()), Some(2));
        assert_eq!(data.bot.as_ref().map(|s| s.len()), Some(2));
        assert_eq!(data.lap_times.and_then(|t| t.bot), Some(50.0));
        assert_eq!(data.lap_times.and_then(|t| t.player), None);
        assert_eq!(data.off_track.map(|o| o.duration), Some(2.0));
        assert_eq!(data.race_time, Some(50.0));
        assert_eq!(study.load_race_time("F", "0 Lag", 1), Some(50.0));
    }

    #[test]
    fn test_race_time_falls_back_to_player_log() {
        let dir = tempfile::tempdir().unwrap();
        let study = Study::new(config(dir.path()));
        write_run(&study, 1, 60, 50);
        let bot = study
            .locator()
            .path("F", "0 Lag", LogFile::Records(LogKind::Bot), 1);
        fs::remove_file(bot).unwrap();

        let data = study.load_run("F", "0 Lag", 1);
        assert!(data.bot.is_none());
        assert_eq!(data.race_time, Some(62.0));
        assert_eq!(study.load_race_time("F", "0 Lag", 1), Some(62.0));
    }

    #[test]
    fn test_flat_layout_prefers_legacy_ai_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudyConfig {
            layout: LogLayout::Flat,
            ..config(dir.path())
        };
        let study = Study::new(config);
        write_run(&study, 1, 60, 50);

        let ai_path = dir.path().join("aidata_1.log");
        assert_eq!(
            study
                .locator()
                .path("F", "0 Lag", LogFile::Records(LogKind::AiPath), 1),
            ai_path
        );
        assert_eq!(study.load_run("F", "0 Lag", 1).race_time, Some(50.0));

        fs::write(&ai_path, format!("{} targetNode X: 3\n", stamp(47))).unwrap();
        assert_eq!(study.load_run("F", "0 Lag", 1).race_time, Some(47.0));
        assert_eq!(study.load_race_time("F", "0 Lag", 1), Some(47.0));
    }

    #[test]
    fn test_missing_run_is_skipped() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let dir = tempfile::tempdir().unwrap();
        let study = Study::new(config(dir.path()));
        write_run(&study, 1, 60, 50);
        write_run(&study, 3, 70, 52);

        let missing = study.load_run("F", "0 Lag", 2);
        assert!(!missing.has_series());
        assert!(missing.lap_times.is_none());

        let results = study.analyze();
        assert_eq!(results.conditions.len(), 1);
        let rows = &results.conditions[0].rows;
        assert_eq!(rows.iter().map(|r| r.run).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(rows[0].player_avg_control, Some(0.25));
        assert_eq!(rows[0].player_control_std, Some(0.0));
        assert_eq!(rows[1].player_completion_time, Some(70.0));
        assert_eq!(rows[1].off_track_seconds, Some(2.0));
    }

    #[test]
    fn test_reports() {
        let dir = tempfile::tempdir().unwrap();
        let study = Study::new(config(dir.path()));
        write_run(&study, 1, 60, 50);
        write_run(&study, 2, 64, 54);

        let results = study.analyze();

        assert_eq!(results.bot.runs.len(), 2);
        let bot = &results.bot.runs[0];
        assert_eq!(bot.avg_abs_control, Some(0.5));
        assert_eq!(bot.path_deviation, Some(5.0));
        let completion = results.bot.completion.unwrap();
        assert_eq!(completion.mean, 52.0);
        assert_eq!(completion.min, 50.0);

        let player_rows: Vec<_> = results
            .overall
            .rows
            .iter()
            .filter(|r| r.source == Source::Player)
            .collect();
        assert_eq!(player_rows.len(), 1);
        assert_eq!(player_rows[0].mean_time, 62.0);
        assert_eq!(player_rows[0].std_time, 2.0);
        assert_eq!(player_rows[0].runs, 2);

        assert_eq!(results.race.entries.len(), 2);
        assert_eq!(results.race.best().map(|e| e.run), Some(1));
    }

    #[test]
    fn test_export_reports() {
        let dir = tempfile::tempdir().unwrap();
        let study = Study::new(config(dir.path()));
        write_run(&study, 1, 60, 50);
        let results = study.analyze();

        let out = dir.path().join("rows.csv");
        export::write_rows(&out, &results.conditions[0].rows, ExportFormat::Csv).unwrap();
        let csv = fs::read_to_string(&out).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("run,player_avg_control,"));
        assert!(lines.next().unwrap().starts_with("1,0.25,"));

        let series = study
            .load_series("F", "0 Lag", LogKind::Bot, 1)
            .unwrap();
        let out = dir.path().join("bot.csv");
        export::write_series(&out, &series, ExportFormat::Csv).unwrap();
        let csv = fs::read_to_string(&out).unwrap();
        assert_eq!(
            csv.lines().next(),
            Some("time,target_x,target_y,car_x,car_y,target_angle,current_angle,diff,control")
        );
        assert_eq!(csv.lines().count(), 3);

        let summary = dir.path().join("race.txt");
        export::write_race_summary(&summary, &results.race).unwrap();
        assert!(fs::read_to_string(summary).unwrap().contains("Total races: 1"));
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.json");
        let config = config(dir.path());
        config.save(&path).unwrap();

        let loaded = StudyConfig::from_file(&path).unwrap();
        assert_eq!(loaded.players, config.players);
        assert_eq!(loaded.conditions, config.conditions);
        assert_eq!(loaded.layout, LogLayout::PerPlayerLag);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(StudyConfig::from_file(&path).is_err());
    }
}
