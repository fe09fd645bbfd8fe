//! The batch stages run in sequence over one genre's files.

use clipfx_media::MediaLibrary;
use clipfx_models::VideoId;
use clipfx_store::{EditAuditLog, RecordStore};
use clipfx_worker::{
    dedupe, prune_low_views, prune_without_effects, read_anomaly_table, write_anomalies,
    AnomalyEngine, PipelineConfig, ReviewSession, ScriptedConsole, StageLogger,
};
use tempfile::TempDir;
use tokio::fs;

const TABLE: &str = "\
video_id,video_playcount,transitions_present,b_roll_footage_present,on_screen_text_present,background_music_present,sound_effects_present,type_of_on_screen_text
101,500000,True,False,False,True,True,
101,500000,True,False,False,False,False,
102,900,True,False,False,False,False,
103,250000,False,False,False,False,False,
104,300000,False,True,True,False,False,\"Transcript, Specific Keywords\"
105,120000,True,False,False,False,False,
";

#[tokio::test]
async fn stages_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut config = PipelineConfig::new("food");
    config.data_dir = dir.path().to_path_buf();

    let csv = config.filtered_csv();
    fs::create_dir_all(csv.parent().unwrap()).await.unwrap();
    fs::write(&csv, TABLE).await.unwrap();

    let videos = config.media_dir();
    fs::create_dir_all(&videos).await.unwrap();
    for name in ["c_101.mp4", "c_102.mp4", "c_103.mp4", "c_104.mp4", "c_105.mp4"] {
        fs::write(videos.join(name), b"v").await.unwrap();
    }
    let media = MediaLibrary::new(&videos);
    let logger = StageLogger::new("pipeline", "food");

    let views = prune_low_views(&csv, config.minimum_views, &media, &logger)
        .await
        .unwrap();
    assert_eq!(views.dropped, vec![VideoId::from("102")]);

    let deduped = dedupe(&csv, None, &logger).await.unwrap();
    assert_eq!(deduped.kept, 4);

    let effects = prune_without_effects(&csv, &config.backup_dir(), &media, &logger)
        .await
        .unwrap();
    assert_eq!(effects.dropped, vec![VideoId::from("103")]);
    assert!(!videos.join("c_103.mp4").exists());

    let engine = AnomalyEngine::new(config.rule_config());
    let flagged = write_anomalies(&csv, &config.anomalies_csv(), &engine, &logger)
        .await
        .unwrap();
    assert_eq!(flagged, 2);

    let results = read_anomaly_table(config.anomalies_csv()).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.video_id().as_str()).collect();
    assert_eq!(ids, vec!["101", "104"]);
    assert_eq!(results[1].triggers(), &["text-conflict".to_string()]);

    let (mut store, _) = RecordStore::load(&csv).await.unwrap();
    let mut audit = EditAuditLog::open(config.edits_log()).await.unwrap();
    let mut console = ScriptedConsole::new(["s", "q"]);
    let summary = ReviewSession::new(&mut store, config.updated_csv(), &mut audit, &mut console)
        .with_media(&media)
        .run(&results)
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(summary.quit);
    assert_eq!(summary.edits, 0);
}
