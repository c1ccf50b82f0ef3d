//! PostgreSQL payroll adapter tests
//!
//! Every test runs against a fresh PostgreSQL container and is ignored
//! unless Docker is available (`cargo test -- --ignored`).

use std::sync::Arc;

use chrono::Utc;
use core_kernel::{FixedClock, PortError, RaiseRate};
use domain_payroll::{FaultPoint, PayrollPort, SalaryRaise, UpdateStrategy};
use infra_db::PostgresPayrollAdapter;
use rust_decimal_macros::dec;
use test_utils::{
    assert_raised_once, assert_stamped_since, assert_untouched, db_test, PayrollFixtures,
    TemporalFixtures, TestCompanyBuilder,
};

fn adapter(db: &test_utils::TestDatabase) -> PostgresPayrollAdapter {
    PostgresPayrollAdapter::new(db.pool().clone())
}

fn raise(company: &domain_payroll::Company, strategy: UpdateStrategy) -> SalaryRaise {
    SalaryRaise::new(company.id, RaiseRate::default(), strategy)
}

mod reference_scenario {
    use super::*;

    db_test!(test_each_strategy_raises_acme_by_ten_percent, |db| {
        for strategy in UpdateStrategy::ALL {
            db.clear_data().await.unwrap();
            db.seed_companies(&PayrollFixtures::all()).await.unwrap();
            let acme = PayrollFixtures::acme();
            let started = Utc::now();

            let outcome = adapter(&db).increase_salaries(raise(&acme, strategy)).await.unwrap();

            assert_eq!(outcome.employees_updated, 2, "{}", strategy);
            assert_eq!(db.salaries(acme.id).await.unwrap(), vec![dec!(1100.00), dec!(2200.00)]);
            let after = adapter(&db).get_company(acme.id).await.unwrap();
            assert_raised_once(&acme, &after, RaiseRate::default());
            assert_stamped_since(&after, started);
        }
    });

    db_test!(test_raise_is_stamped_with_the_clock, |db| {
        db.seed_company(&PayrollFixtures::acme()).await.unwrap();
        let at = TemporalFixtures::raise_time();
        let adapter = adapter(&db).with_clock(Arc::new(FixedClock::new(at)));

        adapter
            .increase_salaries(raise(&PayrollFixtures::acme(), UpdateStrategy::BoundSql))
            .await
            .unwrap();

        assert_eq!(db.last_salary_update(PayrollFixtures::acme().id).await.unwrap(), Some(at));
    });

    db_test!(test_other_companies_are_untouched, |db| {
        db.seed_companies(&PayrollFixtures::all()).await.unwrap();

        for strategy in UpdateStrategy::ALL {
            adapter(&db)
                .increase_salaries(raise(&PayrollFixtures::acme(), strategy))
                .await
                .unwrap();
        }

        let globex = adapter(&db).get_company(PayrollFixtures::globex().id).await.unwrap();
        assert_untouched(&PayrollFixtures::globex(), &globex);
        let empty = adapter(&db).get_company(PayrollFixtures::empty().id).await.unwrap();
        assert_untouched(&PayrollFixtures::empty(), &empty);
    });

    db_test!(test_company_without_employees_is_still_stamped, |db| {
        db.seed_company(&PayrollFixtures::empty()).await.unwrap();

        for strategy in UpdateStrategy::ALL {
            let outcome = adapter(&db)
                .increase_salaries(raise(&PayrollFixtures::empty(), strategy))
                .await
                .unwrap();
            assert_eq!(outcome.employees_updated, 0);
        }

        let stamped = db.last_salary_update(PayrollFixtures::empty().id).await.unwrap();
        assert!(stamped.is_some());
    });
}

mod missing_company {
    use super::*;

    db_test!(test_missing_company_is_not_found_without_writes, |db| {
        db.seed_companies(&PayrollFixtures::all()).await.unwrap();
        let before = db.all_salaries().await.unwrap();

        for strategy in UpdateStrategy::ALL {
            let err = adapter(&db)
                .increase_salaries(SalaryRaise::new(
                    PayrollFixtures::MISSING_COMPANY_ID,
                    RaiseRate::default(),
                    strategy,
                ))
                .await
                .unwrap_err();
            assert!(matches!(err, PortError::NotFound { .. }), "{}: {:?}", strategy, err);
        }

        assert_eq!(db.all_salaries().await.unwrap(), before);
    });
}

mod compounding {
    use super::*;

    db_test!(test_repeated_raises_compound_across_strategies, |db| {
        db.seed_company(&PayrollFixtures::acme()).await.unwrap();
        let acme = PayrollFixtures::acme();

        adapter(&db).increase_salaries(raise(&acme, UpdateStrategy::ObjectGraph)).await.unwrap();
        adapter(&db).increase_salaries(raise(&acme, UpdateStrategy::BoundSql)).await.unwrap();

        assert_eq!(db.salaries(acme.id).await.unwrap(), vec![dec!(1210.00), dec!(2420.00)]);
    });

    db_test!(test_strategies_round_identically, |db| {
        let odd = || {
            TestCompanyBuilder::new()
                .with_id(7)
                .with_salaries(&[dec!(0.05), dec!(0.15), dec!(1234.55), dec!(99999.99)])
                .build()
        };
        let rate = RaiseRate::from_percent(dec!(3.5)).unwrap();
        let mut results = Vec::new();

        for strategy in UpdateStrategy::ALL {
            db.clear_data().await.unwrap();
            db.seed_company(&odd()).await.unwrap();
            adapter(&db)
                .increase_salaries(SalaryRaise::new(odd().id, rate, strategy))
                .await
                .unwrap();
            results.push(db.salaries(odd().id).await.unwrap());
        }

        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
        assert_eq!(results[0], odd().salaries().iter().map(|s| {
            core_kernel::Salary::new(*s).unwrap().raised_by(rate).unwrap().amount()
        }).collect::<Vec<_>>());
    });
}

mod atomicity {
    use super::*;

    async fn assert_fault_rolls_back(
        db: &test_utils::TestDatabase,
        strategy: UpdateStrategy,
        point: FaultPoint,
    ) {
        db.clear_data().await.unwrap();
        db.seed_companies(&PayrollFixtures::all()).await.unwrap();
        let acme = PayrollFixtures::acme();

        let result = adapter(db)
            .with_fault(point)
            .increase_salaries(raise(&acme, strategy))
            .await;

        assert!(result.is_err(), "{} with fault {} should fail", strategy, point);
        let after = adapter(db).get_company(acme.id).await.unwrap();
        assert_untouched(&acme, &after);
    }

    db_test!(test_fault_after_salary_update_rolls_back, |db| {
        for strategy in UpdateStrategy::ALL {
            assert_fault_rolls_back(&db, strategy, FaultPoint::AfterSalaryUpdate).await;
        }
    });

    db_test!(test_fault_before_commit_rolls_back, |db| {
        for strategy in UpdateStrategy::ALL {
            assert_fault_rolls_back(&db, strategy, FaultPoint::BeforeCommit).await;
        }
    });

    db_test!(test_adapter_works_after_rolled_back_raise, |db| {
        db.seed_company(&PayrollFixtures::acme()).await.unwrap();
        let acme = PayrollFixtures::acme();

        let _ = adapter(&db)
            .with_fault(FaultPoint::BeforeCommit)
            .increase_salaries(raise(&acme, UpdateStrategy::InterpolatedSql))
            .await;
        adapter(&db)
            .increase_salaries(raise(&acme, UpdateStrategy::InterpolatedSql))
            .await
            .unwrap();

        assert_eq!(db.salaries(acme.id).await.unwrap(), vec![dec!(1100.00), dec!(2200.00)]);
    });
}

mod repository {
    use super::*;
    use infra_db::CompanyRepository;
    use sqlx::Connection;

    db_test!(test_reads_see_writes_on_the_same_transaction, |db| {
        db.seed_company(&PayrollFixtures::acme()).await.unwrap();
        let acme = PayrollFixtures::acme();
        let repository = CompanyRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        let mut tx = conn.begin().await.unwrap();
        let updated = repository
            .bulk_raise_bound(&mut tx, acme.id, RaiseRate::default())
            .await
            .unwrap();
        let inside = repository
            .find_company_with_employees(&mut tx, acme.id)
            .await
            .unwrap()
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(updated, 2);
        assert_eq!(inside.salaries(), vec![dec!(1100.00), dec!(2200.00)]);
        let after = repository
            .find_company_with_employees(&mut conn, acme.id)
            .await
            .unwrap()
            .unwrap();
        assert_untouched(&acme, &after);
    });

    db_test!(test_missing_company_row_is_none, |db| {
        let mut conn = db.pool().acquire().await.unwrap();
        let row = CompanyRepository::new()
            .find_company(&mut conn, PayrollFixtures::MISSING_COMPANY_ID)
            .await
            .unwrap();
        assert!(row.is_none());
    });
}

mod concurrency {
    use super::*;
    use tokio::task::JoinSet;

    const CONCURRENT_RAISES: usize = 5;

    // Bulk statements multiply in place under row locks, so concurrent raises
    // all land. The object graph writes absolute values computed from its own
    // read and is not protected: two concurrent object-graph raises on one
    // company can lose an update under READ COMMITTED.
    async fn raise_concurrently(db: &test_utils::TestDatabase, strategy: UpdateStrategy) {
        db.clear_data().await.unwrap();
        db.seed_company(&PayrollFixtures::acme()).await.unwrap();
        let adapter = adapter(db);

        let mut tasks = JoinSet::new();
        for _ in 0..CONCURRENT_RAISES {
            let adapter = adapter.clone();
            let raise = raise(&PayrollFixtures::acme(), strategy);
            tasks.spawn(async move { adapter.increase_salaries(raise).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }
    }

    db_test!(test_concurrent_bound_raises_compound, |db| {
        raise_concurrently(&db, UpdateStrategy::BoundSql).await;

        // 1.1^5 with the store rounding after every step
        assert_eq!(
            db.salaries(PayrollFixtures::acme().id).await.unwrap(),
            vec![dec!(1610.51), dec!(3221.02)]
        );
    });

    db_test!(test_concurrent_interpolated_raises_compound, |db| {
        raise_concurrently(&db, UpdateStrategy::InterpolatedSql).await;

        assert_eq!(
            db.salaries(PayrollFixtures::acme().id).await.unwrap(),
            vec![dec!(1610.51), dec!(3221.02)]
        );
    });
}

mod health {
    use super::*;
    use core_kernel::HealthCheckable;

    db_test!(test_health_check_reports_healthy, |db| {
        let result = adapter(&db).health_check().await;
        assert!(result.is_healthy());
        assert_eq!(result.adapter_id, "postgres-payroll-adapter");
    });
}
