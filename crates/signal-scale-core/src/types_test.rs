use super::*;

#[test]
fn competitor_line_with_separator_is_split_and_trimmed() {
    let c = parse_competitor_line("  Ed Hardy |  https://edhardyoriginals.com ").unwrap();
    assert_eq!(c.name.as_deref(), Some("Ed Hardy"));
    assert_eq!(c.website.as_deref(), Some("https://edhardyoriginals.com"));
}

#[test]
fn competitor_line_without_separator_has_no_url() {
    let c = parse_competitor_line("Hellstar").unwrap();
    assert_eq!(c.name.as_deref(), Some("Hellstar"));
    assert_eq!(c.website, None);
}

#[test]
fn competitor_line_blank_segments_map_to_none() {
    let c = parse_competitor_line(" | https://x.com").unwrap();
    assert_eq!(c.name, None);
    assert_eq!(c.website.as_deref(), Some("https://x.com"));

    let c = parse_competitor_line("Affliction |   ").unwrap();
    assert_eq!(c.website, None);
}

#[test]
fn blank_competitor_line_is_skipped() {
    assert!(parse_competitor_line("   ").is_none());
}

#[test]
fn build_payload_maps_form_text() {
    let form = FormInput {
        brand_name: " Crooks & Castles ".to_string(),
        brand_url: String::new(),
        industry: "Streetwear".to_string(),
        competitors: "Ed Hardy | https://edhardyoriginals.com\n\n  Affliction | https://www.afflictionclothing.com\nHellstar\n"
            .to_string(),
        questions: "What trends should we track?, ,What next?".to_string(),
        ..FormInput::default()
    };

    let payload = build_payload(&form);

    assert_eq!(payload.brand.name.as_deref(), Some("Crooks & Castles"));
    assert_eq!(payload.brand.website, None);
    assert_eq!(payload.brand.industry.as_deref(), Some("Streetwear"));
    assert_eq!(payload.brand.description, None);
    assert_eq!(payload.competitors.len(), 3);
    assert_eq!(payload.competitors[2].name.as_deref(), Some("Hellstar"));
    assert_eq!(payload.competitors[2].website, None);
    assert_eq!(
        payload.questions,
        Some(vec![
            "What trends should we track?".to_string(),
            "What next?".to_string()
        ])
    );
}

#[test]
fn build_payload_with_empty_questions_omits_them() {
    let payload = build_payload(&FormInput {
        brand_name: "Acme".to_string(),
        ..FormInput::default()
    });
    assert!(payload.questions.is_none());

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("questions").is_none());
    assert!(json["brand"]["website"].is_null());
    assert!(json["brand"].get("industry").is_none());
}

#[test]
fn payload_serializes_null_name_in_loose_mode() {
    let payload = build_payload(&FormInput::default());
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json["brand"]["name"].is_null());
    assert_eq!(json["competitors"], serde_json::json!([]));
}

#[test]
fn descriptor_accepts_url_alias() {
    let c: CompetitorDescriptor =
        serde_json::from_str(r#"{"name":"Ed Hardy","url":"https://edhardyoriginals.com"}"#)
            .unwrap();
    assert_eq!(c.website.as_deref(), Some("https://edhardyoriginals.com"));
}

#[test]
fn parse_name_list_drops_blanks() {
    assert_eq!(
        parse_name_list("Competitor A, Competitor B,,  "),
        vec!["Competitor A".to_string(), "Competitor B".to_string()]
    );
    assert!(parse_name_list("").is_empty());
}

#[test]
fn validate_request_rejects_blank_brand_name() {
    let mut req = AnalysisRequest::default();
    assert_eq!(validate_request(&req), Err(CoreError::EmptyBrandName));

    req.brand.name = Some("   ".to_string());
    assert_eq!(validate_request(&req), Err(CoreError::EmptyBrandName));

    req.brand.name = Some("Acme".to_string());
    assert_eq!(validate_request(&req), Ok(()));
}

#[test]
fn display_name_defaults_when_missing() {
    assert_eq!(BrandDescriptor::default().display_name(), "Your brand");
    assert_eq!(BrandDescriptor::named("Acme").display_name(), "Acme");
}
