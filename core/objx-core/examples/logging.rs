//! 로깅 시스템 사용 예제
//!
//! 실행: RUST_LOG=debug cargo run --example logging --features logging

use objx_core::{ObjectStore, Record, SaveOutcome};

#[derive(Debug, Clone, Record)]
struct Book {
    #[objx(identity)]
    isbn: String,
    title: String,
    year: u32,
}

fn book(isbn: &str, title: &str, year: u32) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        year,
    }
}

fn main() -> objx_core::ObjxResult<()> {
    // 로깅 초기화
    objx_core::logging::init();

    println!("=== OBJX 로깅 예제 ===\n");
    println!("환경 변수 RUST_LOG로 로그 레벨 조정 가능:");
    println!("  RUST_LOG=debug  - save 판단 과정까지");
    println!("  RUST_LOG=info   - 쿼리 텍스트 (기본값)");
    println!("  RUST_LOG=warn   - 중복 identity만\n");

    let store = ObjectStore::<Book>::new()?;

    println!("데이터 저장 중...");
    store.save(book("978-0", "Dune", 1965))?;
    store.save(book("978-1", "Solaris", 1961))?;
    store.save(book("978-1", "Solaris (2nd ed.)", 1970))?;

    println!("\n데이터 조회 중...");
    let found = store.query("and(greater_than(year,1962), less_than(year,1990))")?;
    for b in &found {
        println!("  {} {} ({})", b.isbn, b.title, b.year);
    }

    println!("\n중복 identity 재현 중...");
    store.insert_unchecked(book("978-0", "Dune (copy)", 1965));
    if let SaveOutcome::DuplicateIdentity { identity, matches } =
        store.save(book("978-0", "Dune", 1966))?
    {
        println!("  {identity}: {matches}건, 저장 취소");
    }

    Ok(())
}
