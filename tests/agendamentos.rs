//! Agendamentos

use chrono::NaiveDateTime;
use mototrack::agendamentos::{self, Agendamento, AgendamentoFilter, AgendamentoRequest};
use mototrack::motos::{self, MotoRequest};
use mototrack::{Error, PageParams};
use test_utils::Provider;

fn at(timestamp: &str) -> NaiveDateTime {
    timestamp.parse().expect("should parse timestamp")
}

async fn moto(provider: &Provider, placa: &str) -> i64 {
    let request = MotoRequest {
        placa: placa.to_string(),
        modelo: "Factor 150".to_string(),
        marca: "Yamaha".to_string(),
        ano: 2024,
        status: "ATIVA".to_string(),
        ..MotoRequest::default()
    };
    motos::create(request, provider).await.expect("should create moto").id
}

fn agendamento(moto_id: i64, data_agendada: &str, descricao: &str) -> AgendamentoRequest {
    AgendamentoRequest {
        moto_id,
        data_agendada: Some(at(data_agendada)),
        descricao: descricao.to_string(),
    }
}

// Should list visits for a motorcycle within a time window.
#[tokio::test]
async fn window() {
    let provider = Provider::new();
    let first = moto(&provider, "ABC1D23").await;
    let second = moto(&provider, "XYZ9W87").await;

    for (moto_id, data, descricao) in [
        (first, "2099-03-01T08:00:00", "Revisão de 10.000 km"),
        (first, "2099-03-01T14:00:00", "Troca de pneus"),
        (first, "2099-03-02T09:00:00", "Revisão de freios"),
        (second, "2099-03-01T10:00:00", "Revisão de 10.000 km"),
    ] {
        agendamentos::create(agendamento(moto_id, data, descricao), &provider)
            .await
            .expect("should create");
    }

    let request = PageParams::default().resolve::<Agendamento>().expect("should resolve");
    let filter = AgendamentoFilter {
        moto_id: Some(first),
        data_inicial: Some(at("2099-03-01T00:00:00")),
        data_final: Some(at("2099-03-01T14:00:00")),
        ..AgendamentoFilter::default()
    };
    let page = agendamentos::query(Some(&filter), &request, &provider).await.expect("should query");
    let descricoes: Vec<_> = page.items.iter().map(|a| a.descricao.as_str()).collect();
    assert_eq!(descricoes, ["Revisão de 10.000 km", "Troca de pneus"]);

    let filter = AgendamentoFilter {
        descricao: Some("REVISÃO".to_string()),
        ..AgendamentoFilter::default()
    };
    let page = agendamentos::query(Some(&filter), &request, &provider).await.expect("should query");
    assert_eq!(page.total, 3);
}

// Should treat an absent filter, an empty filter and a filter of blank
// strings alike.
#[tokio::test]
async fn unconstrained_filters() {
    let provider = Provider::new();
    let moto_id = moto(&provider, "ABC1D23").await;
    for data in ["2099-03-01T08:00:00", "2099-03-02T08:00:00"] {
        agendamentos::create(agendamento(moto_id, data, "Revisão"), &provider)
            .await
            .expect("should create");
    }

    let request = PageParams::default().resolve::<Agendamento>().expect("should resolve");
    let blank = AgendamentoFilter {
        descricao: Some("\t".to_string()),
        ..AgendamentoFilter::default()
    };
    for filter in [None, Some(&AgendamentoFilter::default()), Some(&blank)] {
        let page = agendamentos::query(filter, &request, &provider).await.expect("should query");
        assert_eq!(page.total, 2);
    }
}

// Should refuse visits in the past or for unknown motorcycles.
#[tokio::test]
async fn invalid_requests() {
    let provider = Provider::new();
    let moto_id = moto(&provider, "ABC1D23").await;

    let Err(Error::BadRequest(_)) =
        agendamentos::create(agendamento(moto_id, "2001-01-01T08:00:00", "Revisão"), &provider)
            .await
    else {
        panic!("should be BadRequest");
    };

    let Err(Error::RelatedNotFound { entity, id }) =
        agendamentos::create(agendamento(77, "2099-01-01T08:00:00", "Revisão"), &provider).await
    else {
        panic!("should be RelatedNotFound");
    };
    assert_eq!((entity, id), ("Moto", 77));
}

// Should reschedule and then cancel a visit.
#[tokio::test]
async fn reschedule_and_cancel() {
    let provider = Provider::new();
    let moto_id = moto(&provider, "ABC1D23").await;
    let created =
        agendamentos::create(agendamento(moto_id, "2099-05-10T08:00:00", "Revisão"), &provider)
            .await
            .expect("should create");

    let updated = agendamentos::update(
        created.id,
        agendamento(moto_id, "2099-05-12T08:00:00", "Revisão"),
        &provider,
    )
    .await
    .expect("should update");
    assert_eq!(updated.data_agendada, Some(at("2099-05-12T08:00:00")));

    agendamentos::delete(created.id, &provider).await.expect("should delete");
    let Err(Error::NotFound(_)) = agendamentos::get(created.id, &provider).await else {
        panic!("should be NotFound");
    };
}
