pub fn render_index(date: &str, completed: usize, due: usize) -> String {
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{COMPLETED}}", &completed.to_string())
        .replace("{{DUE}}", &due.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg-1: #f4f6f2;
      --bg-2: #cfe3d4;
      --ink: #23302a;
      --accent: #2d7a4b;
      --accent-2: #2f4858;
      --warn: #c63b2b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e8f1e6 60%, #f2f5ee 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5f6a60;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      width: fit-content;
    }

    .tab {
      border: none;
      background: transparent;
      border-radius: 999px;
      padding: 8px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      color: #5f6a60;
      cursor: pointer;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b948c;
    }

    .stat .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    ul.cards {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    ul.cards li {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    ul.cards li.paused {
      opacity: 0.55;
    }

    .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 50%;
      margin-right: 8px;
    }

    button.small {
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.small.secondary {
      background: var(--accent-2);
    }

    form.new-habit {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    form.new-habit input,
    form.new-habit select {
      flex: 1 1 160px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 10px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    .status {
      font-size: 0.95rem;
      color: #5f6a60;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--warn);
    }

    .status[data-type="ok"] {
      color: var(--accent);
    }

    .view {
      display: none;
    }

    .view.active {
      display: grid;
      gap: 16px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Tracker</h1>
      <p class="subtitle">{{DATE}} &middot; {{COMPLETED}} of {{DUE}} due habits done today.</p>
    </header>

    <div class="tabs" role="tablist">
      <button class="tab active" type="button" data-view="habits" role="tab">Habits</button>
      <button class="tab" type="button" data-view="stats" role="tab">Statistics</button>
      <button class="tab" type="button" data-view="fitness" role="tab">Fitness</button>
    </div>

    <section class="view active" id="view-habits">
      <form class="new-habit" id="new-habit">
        <input id="habit-name" type="text" placeholder="New habit name" required />
        <select id="habit-frequency">
          <option value="daily" selected>Daily</option>
          <option value="weekly">Weekly</option>
          <option value="monthly">Monthly</option>
          <option value="yearly">Yearly</option>
        </select>
        <button class="small" type="submit">Add habit</button>
      </form>
      <ul class="cards" id="habit-list"></ul>
    </section>

    <section class="view" id="view-stats">
      <div class="panel" id="stats-cards"></div>
      <ul class="cards" id="streak-list"></ul>
      <ul class="cards" id="category-list"></ul>
    </section>

    <section class="view" id="view-fitness">
      <div class="panel" id="fitness-cards"></div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const habitList = document.getElementById('habit-list');
    const statsCards = document.getElementById('stats-cards');
    const streakList = document.getElementById('streak-list');
    const categoryList = document.getElementById('category-list');
    const fitnessCards = document.getElementById('fitness-cards');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const getJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const postJson = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const statCard = (label, value) =>
      `<div class="stat"><span class="label">${label}</span><span class="value">${value}</span></div>`;

    const todayKey = () => new Date().toISOString().slice(0, 10);

    const renderHabits = (habits) => {
      habitList.innerHTML = habits.map((habit) => {
        const done = habit.completions && habit.completions[todayKey()];
        return `<li class="${habit.paused ? 'paused' : ''}">
          <span>${habit.name} <small>(${habit.frequency.class})</small></span>
          <span>
            <button class="small" data-complete="${habit.id}">${done ? 'Done ✓' : 'Complete'}</button>
            <button class="small secondary" data-pause="${habit.id}">${habit.paused ? 'Resume' : 'Pause'}</button>
          </span>
        </li>`;
      }).join('');
    };

    const renderStats = (stats) => {
      statsCards.innerHTML = [
        statCard('Habits', stats.total_habits),
        statCard('Active', stats.active_habits),
        statCard('Paused', stats.paused_habits),
        statCard('Done today', stats.completed_today),
        statCard('Daily rate', stats.daily.mean_rate.toFixed(1) + '%'),
        statCard('Weekly rate', stats.weekly.mean_rate.toFixed(1) + '%'),
        statCard('Monthly rate', stats.monthly.mean_rate.toFixed(1) + '%'),
        statCard('Team streak', stats.longest_simultaneous_streak),
        statCard('Holidays this year', stats.holidays_this_year)
      ].join('');

      streakList.innerHTML = stats.streaks.map((streak) =>
        `<li><span>${streak.name}</span><span>current ${streak.current} &middot; best ${streak.longest}</span></li>`
      ).join('');

      categoryList.innerHTML = Object.entries(stats.categories).map(([id, cat]) =>
        `<li><span><span class="swatch" style="background:${cat.color}"></span>${cat.name}</span>
         <span>${cat.habit_count} habits &middot; ${cat.mean_rate.toFixed(1)}%</span></li>`
      ).join('');
    };

    const renderFitness = (fitness) => {
      fitnessCards.innerHTML = [
        statCard('Sessions', fitness.total_sessions),
        statCard('Last 30 days', fitness.recent_sessions),
        statCard('Total minutes', fitness.total_minutes.toFixed(0)),
        statCard('Avg minutes', fitness.avg_minutes.toFixed(1)),
        statCard('Rest days (30d)', fitness.rest_days_last_30),
        statCard('Rest day %', fitness.rest_day_pct.toFixed(1) + '%')
      ].join('');
    };

    const refresh = async () => {
      const [habits, stats, fitness] = await Promise.all([
        getJson('/api/habits'),
        getJson('/api/stats'),
        getJson('/api/fitness')
      ]);
      renderHabits(habits);
      renderStats(stats);
      renderFitness(fitness);
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        tabs.forEach((other) => other.classList.toggle('active', other === button));
        document.querySelectorAll('.view').forEach((view) => {
          view.classList.toggle('active', view.id === 'view-' + button.dataset.view);
        });
      });
    });

    habitList.addEventListener('click', (event) => {
      const complete = event.target.dataset.complete;
      const pause = event.target.dataset.pause;
      if (complete) {
        postJson(`/api/habits/${complete}/complete`, {})
          .then(refresh)
          .catch((err) => setStatus(err.message, 'error'));
      } else if (pause) {
        postJson(`/api/habits/${pause}/pause`)
          .then(refresh)
          .catch((err) => setStatus(err.message, 'error'));
      }
    });

    document.getElementById('new-habit').addEventListener('submit', (event) => {
      event.preventDefault();
      const name = document.getElementById('habit-name').value.trim();
      const cls = document.getElementById('habit-frequency').value;
      const frequency = cls === 'daily' || cls === 'yearly'
        ? { class: cls }
        : { class: cls, days: [] };
      postJson('/api/habits', { name, frequency })
        .then(() => {
          document.getElementById('habit-name').value = '';
          setStatus('Habit added', 'ok');
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
