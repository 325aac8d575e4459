use std::fs;

use crunch_jobs::{plan, JobSpec, JobWriter, JobsConfig, Selection, SlurmTemplate, Step, Suite};

#[test]
fn rewriting_a_job_overwrites_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = JobWriter::new(SlurmTemplate::default(), dir.path(), Vec::new());
    let first = JobSpec::new("jobs/same", vec![Step::bench("first.js")], "1:00:00");
    let second = JobSpec::new("jobs/same", vec![Step::bench("second.js")], "2:00:00");

    let path = writer.write_job(&first).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("first.js"));
    let again = writer.write_job(&second).unwrap();
    assert_eq!(path, again);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("second.js"));
    assert!(!text.contains("first.js"));
    assert!(text.contains("#SBATCH --time=2:00:00"));
}

#[test]
fn suite_plan_round_trips_through_writer() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = dir.path().join("jobs.yaml");
    fs::write(
        &yaml,
        "algorithms: [RGA]\ndirs:\n  results: out\nlinear:\n  datasets: [Jesus]\n  repeats: 3\n",
    )
    .unwrap();
    let config = JobsConfig::load(&yaml).unwrap();

    let mut writer = JobWriter::new(config.template.clone(), dir.path(), Vec::new());
    for suite in [Suite::Linear, Suite::WikiFetch] {
        for entry in plan(suite, &config, &Selection::default()) {
            writer.emit(&entry).unwrap();
        }
    }
    assert_eq!(writer.manifest().len(), 1);
    let submit = String::from_utf8(writer.finish().unwrap()).unwrap();
    let lines: Vec<&str> = submit.lines().collect();
    assert_eq!(lines[0], "#!/bin/sh");
    assert_eq!(lines[1], "sbatch jobs/linear-RGA-Jesus");
    assert_eq!(lines.len(), 2 + 2 * 10);
    assert_eq!(lines.iter().filter(|line| line.starts_with("#!")).count(), 1);

    let job = fs::read_to_string(dir.path().join("jobs/linear-RGA-Jesus")).unwrap();
    assert!(job.contains(
        "~/.nvm/versions/node/v15.0.1/bin/node --expose-gc bench/linear-time.js -c RGA -d Jesus -n 3 > out/RGA-Jesus && \\\n"
    ));
}
