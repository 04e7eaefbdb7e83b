use std::env;

use rust_bureau_api::db::Database;
use rust_bureau_api::db_storage::ReportStorage;
use rust_bureau_api::extractor;
use rust_bureau_api::xml;

const SAMPLE_XML: &str = r#"<INProfileResponse>
  <Current_Application>
    <Current_Application_Details>
      <Current_Applicant_Details>
        <First_Name>Asha</First_Name>
        <Last_Name>Rao</Last_Name>
        <MobilePhoneNumber>9876543210</MobilePhoneNumber>
      </Current_Applicant_Details>
    </Current_Application_Details>
  </Current_Application>
  <SCORE><BureauScore>742</BureauScore></SCORE>
  <CAIS_Account>
    <CAIS_Account_DETAILS>
      <Subscriber_Name>HDFC BANK LTD</Subscriber_Name>
      <Account_Number>XXXX1234</Account_Number>
      <Current_Balance>45000</Current_Balance>
    </CAIS_Account_DETAILS>
  </CAIS_Account>
</INProfileResponse>"#;

/// Integration smoke test for report storage.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn store_and_fetch_report_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    let storage = ReportStorage::new(db.pool.clone());
    storage
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let doc = xml::parse_document(SAMPLE_XML).map_err(|e| anyhow::anyhow!("{}", e))?;
    let report = extractor::extract(&doc);

    let stored = storage
        .store_report(&report)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    assert_ne!(stored.id, uuid::Uuid::nil());

    let fetched = storage
        .fetch_by_id(stored.id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    assert_eq!(fetched.report, report);
    // Postgres stores microseconds; allow for sub-millisecond truncation.
    assert!((fetched.uploaded_at - stored.uploaded_at).num_milliseconds().abs() < 1);

    // A later upload must list before the earlier one.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = storage
        .store_report(&report)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let all = storage.fetch_all().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    let first_pos = all.iter().position(|r| r.id == stored.id).unwrap();
    let second_pos = all.iter().position(|r| r.id == second.id).unwrap();
    assert!(second_pos < first_pos);

    Ok(())
}
