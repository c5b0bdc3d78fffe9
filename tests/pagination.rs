//! Pagination

use std::collections::BTreeSet;

use mototrack::agendamentos::Agendamento;
use mototrack::eventos::Evento;
use mototrack::filiais::Filial;
use mototrack::motos::{self, Moto, MotoFilter, MotoRequest};
use mototrack::usuarios::Usuario;
use mototrack::{Direction, Error, PageParams, PageRequest, Sort};
use test_utils::Provider;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// 25 motorcycles spread over five model years, so that sorting by year
// leaves ties for the id to break.
async fn fleet(provider: &Provider) {
    for n in 0..25 {
        let request = MotoRequest {
            placa: format!("MTK{n:04}"),
            modelo: "Biz 125".to_string(),
            marca: "Honda".to_string(),
            ano: 2020 + n % 5,
            status: if n % 2 == 0 { "ATIVA" } else { "INATIVA" }.to_string(),
            ..MotoRequest::default()
        };
        motos::create(request, provider).await.expect("should create");
    }
}

// Should cover every matching record exactly once across pages, ordering
// ties by id.
#[tokio::test]
async fn stable_pages() {
    init_tracing();
    let provider = Provider::new();
    fleet(&provider).await;

    let mut seen = vec![];
    for page in 0..3 {
        let request = PageRequest::new(page, 10, Sort::desc("ano")).expect("should be valid");
        let result = motos::query(None, &request, &provider).await.expect("should query");
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages(), 3);
        seen.extend(result.items.into_iter().map(|m| (m.ano, m.id)));
    }

    assert_eq!(seen.len(), 25);
    assert_eq!(seen.iter().map(|(_, id)| id).collect::<BTreeSet<_>>().len(), 25);

    // descending by year, then ascending by id within a year
    for pair in seen.windows(2) {
        let ((ano_a, id_a), (ano_b, id_b)) = (pair[0], pair[1]);
        assert!(ano_a > ano_b || (ano_a == ano_b && id_a < id_b));
    }

    let request = PageRequest::new(3, 10, Sort::desc("ano")).expect("should be valid");
    let beyond = motos::query(None, &request, &provider).await.expect("should query");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 25);
}

// Should return, page by page, exactly the records a single unbounded query
// returns for the same filter and sort.
#[tokio::test]
async fn pages_concatenate() {
    let provider = Provider::new();
    fleet(&provider).await;

    let filter = MotoFilter {
        marca: Some("honda".to_string()),
        ano_min: Some(2021),
        ..MotoFilter::default()
    };
    let sort = Sort::desc("ano");

    let request = PageRequest::new(0, 1_000, sort.clone()).expect("should be valid");
    let all = motos::query(Some(&filter), &request, &provider).await.expect("should query");
    let expected: Vec<_> = all.items.iter().map(|m| m.id).collect();
    assert_eq!(expected.len(), 20);

    let mut paged = vec![];
    for page in 0..7 {
        let request = PageRequest::new(page, 3, sort.clone()).expect("should be valid");
        let result = motos::query(Some(&filter), &request, &provider).await.expect("should query");
        assert_eq!(result.total, 20);
        paged.extend(result.items.into_iter().map(|m| m.id));
    }
    assert_eq!(paged, expected);
}

// Should accept sort names as callers send them, and order by the
// corresponding field.
#[tokio::test]
async fn wire_sort_names() {
    let provider = Provider::new();
    fleet(&provider).await;

    let params = PageParams {
        sort: Some("dataHora,desc".to_string()),
        ..PageParams::default()
    };
    let request = params.resolve::<Evento>().expect("should resolve");
    assert_eq!(request.sort(), &Sort::desc("dataHora"));

    let params = PageParams {
        sort: Some("dataAgendada,asc".to_string()),
        ..PageParams::default()
    };
    params.resolve::<Agendamento>().expect("should resolve");

    let params = PageParams {
        size: Some(5),
        sort: Some("dataCriacao,desc".to_string()),
        ..PageParams::default()
    };
    let request = params.resolve::<Moto>().expect("should resolve");
    let page = motos::query(None, &request, &provider).await.expect("should query");
    assert_eq!(page.total, 25);
    assert_eq!(page.items.len(), 5);
    for pair in page.items.windows(2) {
        assert!(pair[0].data_criacao >= pair[1].data_criacao);
    }

    // record field names are not sort names
    let params = PageParams {
        sort: Some("data_hora,desc".to_string()),
        ..PageParams::default()
    };
    let Err(Error::BadRequest(_)) = params.resolve::<Evento>() else {
        panic!("should be BadRequest");
    };
}

// Should count every match, not only those in the page.
#[tokio::test]
async fn filtered_total() {
    let provider = Provider::new();
    fleet(&provider).await;

    let filter = MotoFilter {
        status: Some("ativa".to_string()),
        ..MotoFilter::default()
    };
    let request = PageRequest::new(1, 5, Sort::asc("placa")).expect("should be valid");
    let page = motos::query(Some(&filter), &request, &provider).await.expect("should query");
    assert_eq!(page.total, 13);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].placa, "MTK0010");
}

// Should reject unusable paging parameters.
#[test]
fn invalid_params() {
    let cases = [
        PageParams {
            page: Some(-1),
            ..PageParams::default()
        },
        PageParams {
            size: Some(0),
            ..PageParams::default()
        },
        PageParams {
            size: Some(-5),
            ..PageParams::default()
        },
        PageParams {
            size: Some(1_001),
            ..PageParams::default()
        },
        PageParams {
            sort: Some("senha,asc".to_string()),
            ..PageParams::default()
        },
        PageParams {
            sort: Some("placa,upwards".to_string()),
            ..PageParams::default()
        },
    ];

    for params in cases {
        let Err(Error::BadRequest(_)) = params.resolve::<Moto>() else {
            panic!("should be BadRequest for {params:?}");
        };
    }
}

// Should accept the largest page size and a sort without a direction.
#[test]
fn boundary_params() {
    let params = PageParams {
        page: Some(2),
        size: Some(1_000),
        sort: Some("ano".to_string()),
    };
    let request = params.resolve::<Moto>().expect("should resolve");
    assert_eq!(request.size(), 1_000);
    assert_eq!(request.offset(), 2_000);
    assert_eq!(request.sort().direction, Direction::Ascending);
}

// Should apply each entity's default sort when none is requested.
#[test]
fn default_sorts() {
    let params = PageParams::default();

    let sort = |request: PageRequest| request.sort().clone();
    assert_eq!(sort(params.resolve::<Moto>().expect("should resolve")), Sort::asc("placa"));
    assert_eq!(sort(params.resolve::<Filial>().expect("should resolve")), Sort::asc("nome"));
    assert_eq!(sort(params.resolve::<Usuario>().expect("should resolve")), Sort::asc("nome"));
    assert_eq!(sort(params.resolve::<Evento>().expect("should resolve")), Sort::desc("dataHora"));
    assert_eq!(sort(params.resolve::<Agendamento>().expect("should resolve")), Sort::asc("id"));

    let blank = PageParams {
        sort: Some("  ".to_string()),
        ..PageParams::default()
    };
    assert_eq!(sort(blank.resolve::<Moto>().expect("should resolve")), Sort::asc("placa"));
}

// Should reject a sort field the entity does not allow even when the page
// request was built directly.
#[tokio::test]
async fn unsortable_request() {
    let provider = Provider::new();

    let request = PageRequest::new(0, 10, Sort::asc("latitude")).expect("should be valid");
    let Err(Error::BadRequest(detail)) = motos::query(None, &request, &provider).await else {
        panic!("should be BadRequest");
    };
    assert_eq!(detail, "cannot sort by `latitude`");
}
