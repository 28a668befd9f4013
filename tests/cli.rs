mod cli {
    use assert_cmd::prelude::*;
    use predicates::str::contains;

    use std::fs;
    use std::path::Path;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "home-value-trends";

    const COMMUNITY: &str = "date,community_avg,community_median\n\
        2021-08-01,500000,450000\n\
        2023-11-01,580000,470000\n\
        2024-08-01,590000,480000\n\
        2024-11-01,600000,500000\n";

    const REFERENCE: &str = "date,neighborhood_avg,city_avg,state_avg\n\
        2021-08-01,400000,350000,300000\n\
        2023-11-01,420000,360000,310000\n\
        2024-08-01,440000,370000,320000\n\
        2024-11-01,575000,0,640000\n\
        2025-01-01,580000,1,650000\n";

    fn write_inputs(dir: &Path, community: &str) -> std::io::Result<()> {
        fs::write(dir.join("community.csv"), community)?;
        fs::write(dir.join("reference.csv"), REFERENCE)
    }

    fn command(dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.env_remove("HOME_VALUES_CONFIG")
            .arg("--community")
            .arg(dir.join("community.csv"))
            .arg("--reference")
            .arg(dir.join("reference.csv"));
        Ok(cmd)
    }

    #[test]
    fn tiles_report_not_available_for_zero_reference() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_inputs(dir.path(), COMMUNITY)?;

        command(dir.path())?
            .arg("tiles")
            .assert()
            .success()
            .stdout(contains(
                "SkyTerrace Towns mean home value as of 2024-11-01: $600,000",
            ))
            .stdout(contains("- vs Wesley Heights: +4.3% (+$25,000)"))
            .stdout(contains("- vs Charlotte: N/A (+$600,000)"));
        Ok(())
    }

    #[test]
    fn chart_writes_json_for_range() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_inputs(dir.path(), COMMUNITY)?;
        let out = dir.path().join("chart.json");

        command(dir.path())?
            .args(["chart", "--range", "3M", "--out"])
            .arg(&out)
            .assert()
            .success()
            .stdout(contains("Chart with 4 series from 2024-08-01"));

        let chart: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
        assert_eq!(chart["layout"]["xaxis"]["range"][0], "2024-08-01");
        assert_eq!(chart["layout"]["xaxis"]["range"][1], "2024-11-01");
        assert_eq!(chart["data"][0]["y"][1], 120.0);
        Ok(())
    }

    #[test]
    fn missing_base_date_is_fatal() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_inputs(dir.path(), "date,community_avg\n2022-01-01,500000\n")?;

        command(dir.path())?
            .arg("tiles")
            .assert()
            .failure()
            .stderr(contains("base date 2021-08-01 is missing"));
        Ok(())
    }

    #[test]
    fn export_writes_indexed_columns() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_inputs(dir.path(), COMMUNITY)?;
        let out = dir.path().join("combined.csv");

        command(dir.path())?
            .arg("export")
            .arg("--out")
            .arg(&out)
            .assert()
            .success();

        let written = fs::read_to_string(&out)?;
        assert!(written.lines().next().unwrap_or_default().ends_with("state_avg_indexed"));
        assert_eq!(written.lines().count(), 5);
        Ok(())
    }
}
